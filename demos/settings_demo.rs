//! Settings persistence demonstration
//!
//! Walks the settings store through its lifecycle against the in-memory mock
//! capabilities: first write on an empty region, a run of updates rotating
//! through the slots, recovery after a simulated reboot, and recovery after
//! a corrupted slot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example settings_demo --features mock
//! ```

use bytemuck::{Pod, Zeroable};
use nvstore::platform::mock::{MockFlash, MockRandom, SoftCrc};
use nvstore::settings::{Region, SettingsStore};

/// Region layout: two 1 KB pages at the top of a 512 KB part
const FIRST_LOCATION: u32 = 0x0807_F800;
const PAGE_SIZE: u32 = 1024;
const PAGE_COUNT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct NetConfig {
    address: u32,
    port: u32,
    flags: u32,
}

fn main() {
    let region = Region::new(FIRST_LOCATION, PAGE_COUNT);
    let flash = MockFlash::new(FIRST_LOCATION, PAGE_SIZE, PAGE_COUNT);
    let mut store: SettingsStore<NetConfig, _, _, _> =
        SettingsStore::new(flash, SoftCrc::new(), MockRandom::new(0xC0FFEE), region)
            .expect("store configuration");

    println!("nvstore settings demo");
    println!("=====================");
    println!(
        "region: {:#010x}, {} pages of {} bytes",
        FIRST_LOCATION, PAGE_COUNT, PAGE_SIZE
    );
    println!(
        "slot size: {} bytes, {} slots per rotation",
        store.slot_bytes(),
        store.entry_count()
    );
    println!(
        "endurance at 10K page cycles: {} writes",
        store.endurance_writes(10_000)
    );
    println!();

    // Empty region: nothing to read yet
    let mut config = NetConfig::zeroed();
    assert!(store.read(&mut config).is_err());
    println!("empty region: read reports no settings, as expected");

    // First write seeds version 1 at the region start
    let config = NetConfig {
        address: 0x0A00_0001,
        port: 5760,
        flags: 1,
    };
    store.write(&config).expect("first write");
    println!("wrote version {:?}", store.current_version());

    // A run of updates rotates through the slots
    for port in 5761..5791 {
        let update = NetConfig { port, ..config };
        store.write(&update).expect("update");
    }
    println!(
        "after 30 updates: version {:?}, stats {:?}",
        store.current_version(),
        store.stats()
    );

    // Simulated reboot: the cursor is lost, the scan recovers the latest
    store.reset();
    let mut recovered = NetConfig::zeroed();
    store.read(&mut recovered).expect("recovery read");
    println!(
        "recovered after reset: port {} (version {:?})",
        recovered.port,
        store.current_version()
    );

    // Corrupt the current slot's trailer: recovery falls back one version
    let slot = store.slot_bytes();
    let current_offset = 30 * slot;
    store
        .flash_mut()
        .inject_corruption(FIRST_LOCATION + current_offset + slot - 4);
    store.reset();
    store.read(&mut recovered).expect("fallback read");
    println!(
        "after trailer corruption: fell back to port {} (version {:?})",
        recovered.port,
        store.current_version()
    );

    store.erase().expect("erase");
    assert!(store.read(&mut recovered).is_err());
    println!("region erased: store is empty again");
}
