/// Slot table handing out small integer handles to JavaScript.
///
/// Released slots are reused by the next insert; a stale handle to a
/// released slot resolves to nothing.
#[derive(Debug)]
pub struct Handles<T> {
    slots: Vec<Option<T>>,
}

impl<T> Handles<T> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, value: T) -> usize {
        match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = Some(value);
                free
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    pub fn get_mut(&mut self, handle: usize) -> Option<&mut T> {
        self.slots.get_mut(handle).and_then(Option::as_mut)
    }

    /// Release `handle`. Returns the value if the slot was live.
    pub fn remove(&mut self, handle: usize) -> Option<T> {
        self.slots.get_mut(handle).and_then(Option::take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_is_dead_and_slot_reused() {
        let mut handles = Handles::new();
        let a = handles.insert("a");
        let b = handles.insert("b");
        assert_eq!((a, b), (0, 1));

        assert_eq!(handles.remove(a), Some("a"));
        assert_eq!(handles.get_mut(a), None);
        assert_eq!(handles.remove(a), None);
        assert_eq!(handles.get_mut(b).copied(), Some("b"));

        assert_eq!(handles.insert("c"), a);
        assert_eq!(handles.get_mut(a).copied(), Some("c"));
    }

    #[test]
    fn unknown_handle_is_none() {
        let mut handles: Handles<u8> = Handles::new();
        assert_eq!(handles.get_mut(7), None);
        assert_eq!(handles.remove(7), None);
    }
}
