//! Physical register allocator.
//!
//! No liveness analysis and no spilling: a register is either free or held
//! by exactly one lease, and running out is reported to the caller.

use super::regs::GpRegister;
use std::cell::Cell;
use std::rc::Rc;

/// Registers never handed out: `rax` and `rdx` are clobbered by returns and
/// `idiv`, `rbp` and `rsp` hold the frame.
const RESERVED: [GpRegister; 4] = [
    GpRegister::Rax,
    GpRegister::Rdx,
    GpRegister::Rbp,
    GpRegister::Rsp,
];

fn bit(reg: GpRegister) -> u16 {
    1 << reg.index()
}

/// Bitset over the sixteen general purpose registers. Clones share state,
/// so leases can hold a handle back to the set they came from.
#[derive(Clone, Debug)]
pub struct GpRegisterSet {
    taken: Rc<Cell<u16>>,
    reserved: u16,
}

impl Default for GpRegisterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl GpRegisterSet {
    pub fn new() -> Self {
        Self {
            taken: Rc::new(Cell::new(0)),
            reserved: RESERVED.iter().fold(0, |mask, reg| mask | bit(*reg)),
        }
    }

    /// Number of allocatable registers.
    pub fn capacity(&self) -> usize {
        GpRegister::ALL.len() - self.reserved.count_ones() as usize
    }

    /// Take the first free register in bit order.
    pub(crate) fn acquire(&self) -> Option<GpRegister> {
        let taken = self.taken.get();
        let reg = GpRegister::ALL
            .into_iter()
            .find(|reg| (taken | self.reserved) & bit(*reg) == 0)?;
        self.taken.set(taken | bit(reg));
        Some(reg)
    }

    /// Return a register to the pool.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is not currently held.
    pub(crate) fn release(&self, reg: GpRegister) {
        let taken = self.taken.get();
        assert!(
            taken & bit(reg) != 0,
            "register {} released while not held",
            reg
        );
        self.taken.set(taken & !bit(reg));
    }

    pub fn acquire_guard(&self) -> Option<RegisterLease> {
        let reg = self.acquire()?;
        Some(RegisterLease {
            reg,
            set: self.clone(),
        })
    }

    pub fn is_taken(&self, reg: GpRegister) -> bool {
        self.taken.get() & bit(reg) != 0
    }

    pub fn taken_count(&self) -> usize {
        self.taken.get().count_ones() as usize
    }

    /// Currently held registers in bit order.
    pub fn taken_registers(&self) -> Vec<GpRegister> {
        GpRegister::ALL
            .into_iter()
            .filter(|reg| self.is_taken(*reg))
            .collect()
    }
}

/// A held register, released when dropped.
#[derive(Debug)]
pub struct RegisterLease {
    reg: GpRegister,
    set: GpRegisterSet,
}

impl RegisterLease {
    pub fn reg(&self) -> GpRegister {
        self.reg
    }
}

impl Drop for RegisterLease {
    fn drop(&mut self) {
        self.set.release(self.reg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_skips_reserved() {
        let set = GpRegisterSet::new();
        let first = set.acquire_guard().unwrap();
        let second = set.acquire_guard().unwrap();
        let third = set.acquire_guard().unwrap();
        assert_eq!(first.reg(), GpRegister::Rbx);
        assert_eq!(second.reg(), GpRegister::Rcx);
        assert_eq!(third.reg(), GpRegister::Rsi);
        assert_eq!(set.taken_count(), 3);
    }

    #[test]
    fn test_lease_releases_on_drop() {
        let set = GpRegisterSet::new();
        {
            let _a = set.acquire_guard().unwrap();
            let _b = set.acquire_guard().unwrap();
            assert_eq!(set.taken_count(), 2);
        }
        assert_eq!(set.taken_count(), 0);
        assert_eq!(set.acquire_guard().unwrap().reg(), GpRegister::Rbx);
    }

    #[test]
    fn test_release_only_clears_one_bit() {
        let set = GpRegisterSet::new();
        let a = set.acquire_guard().unwrap();
        let b = set.acquire_guard().unwrap();
        drop(a);
        assert!(set.is_taken(b.reg()));
        assert_eq!(set.taken_registers(), vec![GpRegister::Rcx]);
        // the freed register is handed out again first
        assert_eq!(set.acquire_guard().unwrap().reg(), GpRegister::Rbx);
    }

    #[test]
    fn test_exhaustion() {
        let set = GpRegisterSet::new();
        let held: Vec<_> = (0..set.capacity())
            .map(|_| set.acquire_guard().unwrap())
            .collect();
        assert_eq!(held.len(), 12);
        assert!(set.acquire_guard().is_none());
        assert!(!set.is_taken(GpRegister::Rsp));
        assert!(!set.is_taken(GpRegister::Rbp));
    }

    #[test]
    #[should_panic(expected = "released while not held")]
    fn test_double_release_panics() {
        let set = GpRegisterSet::new();
        let reg = set.acquire().unwrap();
        set.release(reg);
        set.release(reg);
    }
}
