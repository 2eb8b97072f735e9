/// One scanline of synchronous block RAM.
///
/// The write port is a read-modify-write port: it can sample the cell it is
/// about to overwrite (the cascade `line2 <- line1 <- line0` relies on this).
/// The read port is registered twice, so a value is only observable two
/// cycles after its address was presented:
///
/// - cycle `t`:   address presented, latched into `port.addr` at the edge
/// - cycle `t+1`: `mem[port.addr]` registered into `port.q` at the edge
/// - cycle `t+2`: `port.q` is visible to the window stage
///
/// A read latched on the cycle after a write to the same address observes
/// the written value.
#[derive(Clone, Debug)]
pub struct LineMemory {
    cells: Vec<u8>,
    port: ReadPort,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadPort {
    /// Address latched at the end of the cycle it was presented on.
    pub addr: Option<u32>,
    /// Registered read data.
    pub q: u8,
}

/// Next-cycle values for one memory, computed from a snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryUpdate {
    pub write: Option<(u32, u8)>,
    pub port: ReadPort,
}

impl LineMemory {
    pub fn new(width: usize) -> Self {
        Self {
            cells: vec![0; width],
            port: ReadPort::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Write-port sample of a cell, as seen before this cycle's write.
    #[inline]
    pub fn cell(&self, addr: u32) -> u8 {
        self.cells[addr as usize]
    }

    #[inline]
    pub fn q(&self) -> u8 {
        self.port.q
    }

    #[inline]
    pub fn port(&self) -> ReadPort {
        self.port
    }

    /// Compute the next read-port state and the pending write.
    ///
    /// `read_addr` is the address presented this cycle (`None` when the read
    /// enable is low). The output register only loads when an address was
    /// latched on the previous cycle; otherwise it holds.
    pub fn stage(&self, read_addr: Option<u32>, write: Option<(u32, u8)>) -> MemoryUpdate {
        let q = match self.port.addr {
            Some(addr) => self.cells[addr as usize],
            None => self.port.q,
        };
        MemoryUpdate {
            write,
            port: ReadPort { addr: read_addr, q },
        }
    }

    pub fn commit(&mut self, update: MemoryUpdate) {
        if let Some((addr, value)) = update.write {
            self.cells[addr as usize] = value;
        }
        self.port = update.port;
    }

    #[cfg(test)]
    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }
}
