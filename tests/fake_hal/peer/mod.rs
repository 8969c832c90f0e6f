use super::bus::Levels;

/// Target of the byte currently being clocked in.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Target {
    Address,
    Register,
    Data,
}

/// Ack slot a peer can be told to leave unanswered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    WriteAddress,
    Register,
    ReadAddress,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum After {
    Receive(Target),
    Send,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Receiving { target: Target, bits: u8, value: u8 },
    /// Holding SDA low for the ack clock.
    Acking(After),
    /// `bits` of the current byte already put on SDA.
    Sending { bits: u8 },
    AwaitingAck,
}

/// Slave side of a DHT12: samples SDA on rising SCL, changes SDA on falling SCL.
#[derive(Debug)]
pub struct Dht12Peer {
    address: u8,
    pub registers: Vec<u8>,
    pointer: usize,
    state: State,
    driving_low: bool,
    nack_at: Option<Stage>,
    pub starts: usize,
    pub stops: usize,
}

impl Dht12Peer {
    pub fn new(registers: [u8; 5]) -> Dht12Peer {
        Dht12Peer {
            address: 0x5C,
            registers: registers.to_vec(),
            pointer: 0,
            state: State::Idle,
            driving_low: false,
            nack_at: None,
            starts: 0,
            stops: 0,
        }
    }

    /// Answer to a different address, so the master never sees an ack.
    pub fn at_address(mut self, address: u8) -> Dht12Peer {
        self.address = address;
        self
    }

    /// Match the address but stay silent in the ack slot of `stage`.
    pub fn nack_at(mut self, stage: Stage) -> Dht12Peer {
        self.nack_at = Some(stage);
        self
    }

    pub fn driving_low(&self) -> bool {
        self.driving_low
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    pub fn on_change(&mut self, old: Levels, new: Levels) {
        match (old.scl, new.scl) {
            (true, true) if old.sda && !new.sda => {
                self.starts += 1;
                self.driving_low = false;
                self.state = State::Receiving {
                    target: Target::Address,
                    bits: 0,
                    value: 0,
                };
            }
            (true, true) if !old.sda && new.sda => {
                self.stops += 1;
                self.driving_low = false;
                self.state = State::Idle;
            }
            (false, true) => self.rising(new.sda),
            (true, false) => self.falling(),
            _ => {}
        }
    }

    fn rising(&mut self, sda: bool) {
        match self.state {
            State::Receiving {
                target,
                bits,
                value,
            } if bits < 8 => {
                self.state = State::Receiving {
                    target,
                    bits: bits + 1,
                    value: (value << 1) | sda as u8,
                };
            }
            State::AwaitingAck => {
                if sda {
                    self.state = State::Idle;
                } else {
                    self.pointer += 1;
                    self.state = State::Sending { bits: 0 };
                }
            }
            _ => {}
        }
    }

    fn falling(&mut self) {
        match self.state {
            State::Receiving {
                target,
                bits: 8,
                value,
            } => self.acknowledge(target, value),
            State::Acking(After::Receive(target)) => {
                self.driving_low = false;
                self.state = State::Receiving {
                    target,
                    bits: 0,
                    value: 0,
                };
            }
            State::Acking(After::Send) => {
                self.state = State::Sending { bits: 0 };
                self.drive_next_bit();
            }
            State::Sending { .. } => self.drive_next_bit(),
            _ => {}
        }
    }

    fn acknowledge(&mut self, target: Target, value: u8) {
        let stage = match target {
            Target::Address if value & 1 == 1 => Some(Stage::ReadAddress),
            Target::Address => Some(Stage::WriteAddress),
            Target::Register => Some(Stage::Register),
            Target::Data => None,
        };
        if stage.is_some() && stage == self.nack_at {
            self.state = State::Idle;
            return;
        }

        let after = match target {
            Target::Address => {
                if value >> 1 != self.address {
                    self.state = State::Idle;
                    return;
                }
                if value & 1 == 1 {
                    After::Send
                } else {
                    After::Receive(Target::Register)
                }
            }
            Target::Register => {
                self.pointer = value as usize;
                After::Receive(Target::Data)
            }
            Target::Data => {
                let index = self.pointer % self.registers.len();
                self.registers[index] = value;
                self.pointer += 1;
                After::Receive(Target::Data)
            }
        };
        self.driving_low = true;
        self.state = State::Acking(after);
    }

    fn drive_next_bit(&mut self) {
        if let State::Sending { bits } = self.state {
            if bits < 8 {
                let byte = self.registers[self.pointer % self.registers.len()];
                self.driving_low = (byte >> (7 - bits)) & 1 == 0;
                self.state = State::Sending { bits: bits + 1 };
            } else {
                self.driving_low = false;
                self.state = State::AwaitingAck;
            }
        }
    }
}
