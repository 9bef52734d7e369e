use crate::backend::NativeCursor;
use crate::backend::com::ComCursor;
use crate::error::AdsiResult;
use crate::handle::Handle;
use crate::object::Object;
use crate::runtime::ComRuntime;

/// Forward-only cursor over the objects of a container or member list.
///
/// Each step fetches exactly one element from the provider. The iterator
/// fuses after the end of the sequence or after the first error; call
/// [`ObjectIter::next_object`] directly to keep going past an error.
pub struct ObjectIter<C: NativeCursor = ComCursor> {
    handle: Handle<C>,
    done: bool,
}

impl<C: NativeCursor> ObjectIter<C> {
    pub fn new(cursor: C) -> Self {
        Self::from_handle(Handle::new("ObjectIter", cursor))
    }

    pub fn with_runtime(cursor: C, runtime: &'static ComRuntime) -> Self {
        Self::from_handle(Handle::with_runtime("ObjectIter", cursor, runtime))
    }

    pub(crate) fn from_handle(handle: Handle<C>) -> Self {
        Self {
            handle,
            done: false,
        }
    }

    /// Advances by one element.
    ///
    /// Returns `Ok(None)` at the end of the sequence. An element that is
    /// not a directory object fails with
    /// [`AdsiError::NonDispatchVariant`](crate::AdsiError::NonDispatchVariant).
    pub fn next_object(&self) -> AdsiResult<Option<Object<C::Object>>> {
        let next = self
            .handle
            .derive_mut("next", "Object", |cursor| cursor.next())?;
        Ok(next.map(Object::from_handle))
    }

    /// Releases the enumerator. Idempotent.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl<C: NativeCursor> Iterator for ObjectIter<C> {
    type Item = AdsiResult<Object<C::Object>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_object() {
            Ok(Some(object)) => Some(Ok(object)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: NativeCursor> std::fmt::Debug for ObjectIter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectIter")
            .field("closed", &self.is_closed())
            .field("done", &self.done)
            .finish()
    }
}
