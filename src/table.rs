use axerrno::{ax_err, AxResult};
use spin::Mutex;

/// A registered handler and its opaque argument.
#[derive(Debug, Clone, Copy)]
pub struct IsrEntry {
    pub handler: fn(usize),
    pub arg: usize,
}

impl IsrEntry {
    pub fn invoke(&self) {
        (self.handler)(self.arg)
    }
}

/// Maps a table index to a handler. `None` is a normal answer: nothing is
/// registered there yet.
pub trait VectorTable {
    fn lookup(&self, index: usize) -> Option<IsrEntry>;

    /// Installs a handler. Read-only tables keep the default.
    fn attach(&self, _index: usize, _handler: fn(usize), _arg: usize) -> AxResult {
        ax_err!(Unsupported, "vector table is read-only")
    }

    fn detach(&self, _index: usize) -> Option<IsrEntry> {
        None
    }
}

impl<T: VectorTable + ?Sized> VectorTable for &T {
    fn lookup(&self, index: usize) -> Option<IsrEntry> {
        (**self).lookup(index)
    }

    fn attach(&self, index: usize, handler: fn(usize), arg: usize) -> AxResult {
        (**self).attach(index, handler, arg)
    }

    fn detach(&self, index: usize) -> Option<IsrEntry> {
        (**self).detach(index)
    }
}

/// Fixed-size vector table.
///
/// `register`/`unregister` must not be interrupted by a dispatch on the same
/// core, or the dispatch spins on the table lock forever. Use
/// [`crate::Ipic::connect`] and [`crate::Ipic::disconnect`], which take the
/// interrupt guard first.
pub struct IsrTable<const N: usize> {
    entries: Mutex<[Option<IsrEntry>; N]>,
}

impl<const N: usize> IsrTable<N> {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new([None; N]),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn register(&self, index: usize, handler: fn(usize), arg: usize) -> AxResult {
        if index >= N {
            return ax_err!(InvalidInput, "vector table index out of range");
        }
        let mut entries = self.entries.lock();
        if entries[index].is_some() {
            return ax_err!(AlreadyExists, "vector table slot already taken");
        }
        entries[index] = Some(IsrEntry { handler, arg });
        Ok(())
    }

    pub fn unregister(&self, index: usize) -> Option<IsrEntry> {
        self.entries.lock().get_mut(index)?.take()
    }
}

impl<const N: usize> Default for IsrTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VectorTable for IsrTable<N> {
    fn lookup(&self, index: usize) -> Option<IsrEntry> {
        // Copy out so the lock is released before the handler runs.
        self.entries.lock().get(index).copied().flatten()
    }

    fn attach(&self, index: usize, handler: fn(usize), arg: usize) -> AxResult {
        self.register(index, handler, arg)
    }

    fn detach(&self, index: usize) -> Option<IsrEntry> {
        self.unregister(index)
    }
}

#[cfg(test)]
mod tests {
    use axerrno::AxError;

    use super::*;

    fn nop(_: usize) {}

    #[test]
    fn missing_entry_is_none() {
        let table = IsrTable::<4>::new();
        assert!(table.lookup(2).is_none());
        assert!(table.lookup(100).is_none());
    }

    #[test]
    fn register_rejects_bad_index_and_duplicates() {
        let table = IsrTable::<4>::new();
        assert_eq!(table.register(4, nop, 0), Err(AxError::InvalidInput));
        table.register(1, nop, 7).unwrap();
        assert_eq!(table.register(1, nop, 8), Err(AxError::AlreadyExists));
        assert_eq!(table.lookup(1).map(|e| e.arg), Some(7));
        assert_eq!(table.unregister(1).map(|e| e.arg), Some(7));
        assert!(table.lookup(1).is_none());
        assert!(table.unregister(9).is_none());
    }
}
