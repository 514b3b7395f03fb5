//! List command implementation

use anyhow::Result;
use gremlin_fsck::registry;

pub fn run() -> Result<u8> {
    for check in registry() {
        println!("{:<26} {}", check.name, check.description);
    }
    Ok(0)
}
