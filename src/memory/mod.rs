// Memory interface for the 6502 core

pub trait Memory {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
    fn reset(&mut self);
}

// $0000-$00FF: Zero page
// $0100-$01FF: Stack
// $0200-$FFFF: General purpose
pub const MEMORY_SIZE: usize = 0x10000; // 64KB

/// Flat 64KB RAM. Every `u16` address is backed by a byte.
pub struct BasicMemory {
    ram: Box<[u8; MEMORY_SIZE]>,
}

impl BasicMemory {
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Copy `bytes` into memory starting at `start`, wrapping past $FFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for BasicMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for BasicMemory {
    fn read(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
    }

    fn reset(&mut self) {
        self.ram.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicMemory, Memory};

    #[test]
    fn test_starts_zeroed() {
        let memory = BasicMemory::new();
        assert_eq!(memory.read(0x0000), 0x00);
        assert_eq!(memory.read(0x8000), 0x00);
        assert_eq!(memory.read(0xFFFF), 0x00);
    }

    #[test]
    fn test_read_write() {
        let mut memory = BasicMemory::new();

        memory.write(0x1234, 0x42);
        memory.write(0xFFFF, 0x99);

        assert_eq!(memory.read(0x1234), 0x42);
        assert_eq!(memory.read(0xFFFF), 0x99);
        assert_eq!(memory.read(0x1235), 0x00);
    }

    #[test]
    fn test_reset_zero_fills() {
        let mut memory = BasicMemory::new();

        memory.write(0x0000, 0x01);
        memory.write(0x01FF, 0x02);
        memory.write(0xFFFF, 0x03);
        memory.reset();

        assert_eq!(memory.read(0x0000), 0x00);
        assert_eq!(memory.read(0x01FF), 0x00);
        assert_eq!(memory.read(0xFFFF), 0x00);
    }

    #[test]
    fn test_load_wraps_at_top_of_memory() {
        let mut memory = BasicMemory::new();

        memory.load(0xFFFE, &[0xA9, 0x42, 0x00]);

        assert_eq!(memory.read(0xFFFE), 0xA9);
        assert_eq!(memory.read(0xFFFF), 0x42);
        assert_eq!(memory.read(0x0000), 0x00);

        memory.load(0xFFFF, &[0x11, 0x22]);
        assert_eq!(memory.read(0x0000), 0x22);
    }
}
