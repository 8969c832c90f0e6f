#![allow(dead_code)]

pub mod peer;

use dht12_bitbang::i2c::I2cBB;
use dht12_bitbang::timing::TimingProfile;
use std::cell::RefCell;
use std::rc::Rc;

pub type FakeI2c = I2cBB<bus::FakeLine, bus::FakeLine, bus::FakeDelay>;

/// Wire up a master on a fresh bus, optionally with a DHT12 attached.
pub fn setup(peer: Option<peer::Dht12Peer>) -> (Rc<RefCell<bus::Bus>>, FakeI2c) {
    let bus = Rc::new(RefCell::new(bus::Bus::new(peer)));
    let i2c = I2cBB::new(
        bus::FakeLine::new(&bus, bus::Role::Clock),
        bus::FakeLine::new(&bus, bus::Role::Data),
        bus::FakeDelay::new(&bus),
        TimingProfile::default(),
    )
    .unwrap();
    (bus, i2c)
}
