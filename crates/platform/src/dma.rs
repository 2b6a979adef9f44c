//! DMA buffer abstractions
//!
//! Transfers run asynchronously to the code that submitted them, so the
//! hardware only ever sees a raw [`DmaSlice`] (pointer + byte length). The
//! safe constructors require `'static` buffers; anything shorter-lived has to
//! go through the `unsafe` raw constructor and uphold the lifetime itself.

use core::mem::size_of_val;

/// DMA buffer trait (read-only access)
pub trait DmaBuffer {
    /// Get buffer pointer
    fn as_ptr(&self) -> *const u8;

    /// Get buffer length in bytes
    fn len(&self) -> usize;

    /// Check if buffer is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// DMA buffer trait (read-write access)
pub trait DmaBufferMut: DmaBuffer {
    /// Get mutable buffer pointer
    fn as_mut_ptr(&mut self) -> *mut u8;
}

impl DmaBuffer for &[u8] {
    fn as_ptr(&self) -> *const u8 {
        (*self).as_ptr()
    }

    fn len(&self) -> usize {
        (*self).len()
    }
}

impl DmaBuffer for &mut [u8] {
    fn as_ptr(&self) -> *const u8 {
        (**self).as_ptr()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl DmaBufferMut for &mut [u8] {
    fn as_mut_ptr(&mut self) -> *mut u8 {
        (**self).as_mut_ptr()
    }
}

/// Raw view of a transfer buffer: start address and length in bytes.
///
/// `DmaSlice` is `Copy` and carries no lifetime. It is the form in which a
/// buffer is stored in a queued transfer, handed to the hardware, and handed
/// back to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaSlice {
    ptr: *mut u8,
    len: usize,
}

// SAFETY: a DmaSlice is only an address range. Every safe constructor takes a
// 'static buffer and the raw constructor makes the caller guarantee validity
// until the transfer completes, so moving the view between the foreground and
// interrupt context cannot create a dangling access by itself.
unsafe impl Send for DmaSlice {}

impl DmaSlice {
    /// View a `'static` buffer that the hardware will only read (transmit).
    pub fn from_static<T: Copy>(buffer: &'static [T]) -> Self {
        Self {
            ptr: buffer.as_ptr().cast::<u8>().cast_mut(),
            len: size_of_val(buffer),
        }
    }

    /// View a `'static` buffer that the hardware will write (receive).
    pub fn from_static_mut<T: Copy>(buffer: &'static mut [T]) -> Self {
        Self {
            ptr: buffer.as_mut_ptr().cast::<u8>(),
            len: size_of_val(buffer),
        }
    }

    /// View any [`DmaBufferMut`].
    ///
    /// # Safety
    ///
    /// The buffer must stay valid, and must not be accessed through any other
    /// path, until the transfer using it has completed or been aborted.
    pub unsafe fn from_buffer<B: DmaBufferMut>(buffer: &mut B) -> Self {
        Self {
            ptr: buffer.as_mut_ptr(),
            len: buffer.len(),
        }
    }

    /// Build a view from a raw address range.
    ///
    /// # Safety
    ///
    /// `ptr..ptr + len` must be valid for DMA access until the transfer using
    /// it has completed or been aborted.
    pub const unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Start address of the buffer.
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// Mutable start address of the buffer (for receive transfers).
    pub const fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` for a zero-length view, which means "no buffer".
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reborrow the bytes behind this view.
    ///
    /// # Safety
    ///
    /// The original buffer must still be alive and the hardware must no
    /// longer be writing to it (the transfer has completed or been aborted).
    pub unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        // SAFETY: validity of ptr..ptr+len is the caller's obligation above.
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl DmaBuffer for DmaSlice {
    fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    fn len(&self) -> usize {
        self.len
    }
}
