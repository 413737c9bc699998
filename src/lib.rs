#![allow(clippy::missing_safety_doc)]

use core::{
  alloc::{GlobalAlloc, Layout},
  cell::UnsafeCell,
  fmt::{self, Write},
  hint,
  mem::size_of,
  ptr::{self, NonNull, null_mut},
  sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

// =============================================================================
// Constants
// =============================================================================

/// Page size assumed for every mapping. Where the OS page is larger (e.g. 16KB
/// on some arm64 systems) mappings are still aligned to it, we only waste the
/// tail of each page.
pub const PAGE_SIZE: usize = 4096;
const PAGE_MASK: usize = !(PAGE_SIZE - 1);

/// Every pointer handed out by `allocate` is aligned to at least this.
pub const MIN_ALIGN: usize = 8;

/// Smallest and largest size classes served from arenas.
pub const MIN_CLASS_SIZE: usize = 8;
pub const MAX_CLASS_SIZE: usize = 1024;
const MIN_CLASS_BITS: u32 = MIN_CLASS_SIZE.trailing_zeros();

/// Number of power-of-two size classes: 8, 16, ..., 1024.
pub const CLASS_COUNT: usize = (MAX_CLASS_SIZE.trailing_zeros() - MIN_CLASS_BITS) as usize + 1;

/// Bytes in front of a large allocation's payload.
pub const LARGE_HEADER_SIZE: usize = size_of::<RegionHeader>();
/// Bytes in front of an arena's first slot.
pub const ARENA_HEADER_SIZE: usize = size_of::<Arena>();

/// Largest alignment the large path honours. The payload must stay inside the
/// first page so its header can be found by rounding down.
const MAX_LARGE_ALIGN: usize = PAGE_SIZE / 2;

/// Regions mapped and not yet unmapped. Diagnostic only, the allocation path
/// never reads it except to detect a release with nothing outstanding.
static OUTSTANDING_REGIONS: AtomicUsize = AtomicUsize::new(0);

// =============================================================================
// Compile-Time Assertions
// =============================================================================

const _: () = assert!(PAGE_SIZE.is_power_of_two());
const _: () = assert!(PAGE_SIZE % MIN_ALIGN == 0);
const _: () = assert!(LARGE_HEADER_SIZE % MIN_ALIGN == 0);
const _: () = assert!(ARENA_HEADER_SIZE == 64); // 1 cache line
const _: () = assert!(CLASS_COUNT == 8);
const _: () = assert!(class_size(0) == MIN_CLASS_SIZE);
const _: () = assert!(class_size(CLASS_COUNT - 1) == MAX_CLASS_SIZE);
const _: () = assert!(Arena::capacity(MAX_CLASS_SIZE) >= 1);
const _: () = assert!(MAX_LARGE_ALIGN + LARGE_HEADER_SIZE <= PAGE_SIZE);

// =============================================================================
// Types
// =============================================================================

/// Sits at offset 0 of every mapping.
#[repr(C)]
struct RegionHeader {
  /// Length passed to `mmap`, and later to `munmap`.
  total_bytes: usize,
  /// Slot size when the region backs an arena, 0 for a large allocation.
  slot_size: usize,
}

/// One-page slab of equally sized slots, handed out by bumping `cursor`.
///
/// Freed slots are only counted, never reused: the page goes back to the OS
/// once every slot it will ever issue has been issued and freed.
#[repr(C, align(64))]
struct Arena {
  region: RegionHeader,
  /// Slots handed out and not yet freed.
  live: usize,
  /// Bytes left for new slots.
  remaining: usize,
  /// Next slot to hand out.
  cursor: *mut u8,
}

/// Reasons to give up on the process. Each means the bookkeeping is already
/// corrupt, so carrying on would only spread the damage. Reported through
/// `fatal`, never a panic: the panic machinery allocates, and the heap lock
/// may be held.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(not(debug_assertions), allow(dead_code))]
enum Fatal {
  #[error("region {addr:#x} released with no regions outstanding (double release)")]
  DoubleRelease { addr: usize },
  #[error("munmap({addr:#x}, {len}) failed with errno {errno}")]
  UnmapFailed { addr: usize, len: usize, errno: i32 },
  #[error("slot {slot:#x} was not issued by arena {arena:#x} (slot size {slot_size})")]
  ForeignSlot {
    slot: usize,
    arena: usize,
    slot_size: usize,
  },
  #[error("arena {arena:#x} released a slot with none live (double free)")]
  NoLiveSlots { arena: usize },
  #[error("drained arena {arena:#x} is still current for its class")]
  DrainedWhileCurrent { arena: usize },
}

// =============================================================================
// Platform
// =============================================================================

unsafe fn os_mmap(size: usize) -> *mut u8 {
  let ptr = unsafe {
    libc::mmap(
      null_mut(),
      size,
      libc::PROT_READ | libc::PROT_WRITE,
      libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
      -1,
      0,
    )
  };

  if ptr == libc::MAP_FAILED {
    null_mut()
  } else {
    ptr as *mut u8
  }
}

unsafe fn os_munmap(ptr: *mut u8, size: usize) -> bool {
  unsafe { libc::munmap(ptr.cast(), size) == 0 }
}

/// Fixed buffer for formatting the fatal message. The heap may be us.
struct StackWriter {
  buf: [u8; 256],
  len: usize,
}

impl StackWriter {
  const fn new() -> Self {
    Self {
      buf: [0; 256],
      len: 0,
    }
  }

  fn as_bytes(&self) -> &[u8] {
    &self.buf[..self.len]
  }
}

impl Write for StackWriter {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    // Truncate rather than fail, a partial message beats none.
    let n = s.len().min(self.buf.len() - self.len);
    self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
    self.len += n;
    Ok(())
  }
}

#[cold]
#[inline(never)]
fn fatal(reason: Fatal) -> ! {
  let mut out = StackWriter::new();
  let _ = writeln!(out, "pagealloc: fatal: {reason}");
  let msg = out.as_bytes();
  unsafe {
    libc::write(libc::STDERR_FILENO, msg.as_ptr().cast(), msg.len());
    // Lets an attached debugger stop right here.
    libc::raise(libc::SIGTRAP);
  }
  std::process::abort()
}

// =============================================================================
// Region
// =============================================================================

impl RegionHeader {
  /// Maps `size` zeroed bytes and writes the header at their start.
  /// Returns `None` if the OS is out of memory.
  unsafe fn create(size: usize, slot_size: usize) -> Option<NonNull<RegionHeader>> {
    debug_assert!(size >= size_of::<RegionHeader>());

    let base = unsafe { os_mmap(size) };
    let header = NonNull::new(base)?.cast::<RegionHeader>();
    unsafe {
      header.write(RegionHeader {
        total_bytes: size,
        slot_size,
      })
    };
    OUTSTANDING_REGIONS.fetch_add(1, Ordering::Relaxed);
    Some(header)
  }

  /// Header of the region whose first page contains `ptr`. Arenas are one page
  /// and large payloads start inside the first page, so rounding down always
  /// lands on the mapping base.
  #[inline]
  fn enclosing(ptr: *mut u8) -> *mut RegionHeader {
    ptr.map_addr(|addr| addr & PAGE_MASK).cast()
  }

  /// Unmaps the region containing `ptr`. Aborts on a release with nothing
  /// outstanding or a failing `munmap`.
  unsafe fn destroy(ptr: *mut u8) {
    let header = Self::enclosing(ptr);
    let len = unsafe { (*header).total_bytes };

    if OUTSTANDING_REGIONS
      .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
      .is_err()
    {
      fatal(Fatal::DoubleRelease {
        addr: header.addr(),
      });
    }

    if !unsafe { os_munmap(header.cast(), len) } {
      let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
      fatal(Fatal::UnmapFailed {
        addr: header.addr(),
        len,
        errno,
      });
    }
  }
}

/// Number of regions currently mapped by this allocator.
pub fn outstanding_regions() -> usize {
  OUTSTANDING_REGIONS.load(Ordering::Relaxed)
}

// =============================================================================
// Large allocation
// =============================================================================

fn alloc_large(size: usize) -> Option<NonNull<u8>> {
  let total = size.checked_add(LARGE_HEADER_SIZE)?;
  let header = unsafe { RegionHeader::create(total, 0) }?;
  Some(unsafe { header.cast::<u8>().add(LARGE_HEADER_SIZE) })
}

/// Large allocation whose payload is aligned to `align`. Over-maps by `align`
/// and skips forward from the header to the first aligned address.
fn alloc_large_aligned(size: usize, align: usize) -> Option<NonNull<u8>> {
  if !align.is_power_of_two() || align > MAX_LARGE_ALIGN {
    return None;
  }
  // The payload right after the header is already aligned enough.
  if align <= LARGE_HEADER_SIZE {
    return alloc_large(size);
  }

  let total = size.checked_add(align)?.checked_add(LARGE_HEADER_SIZE)?;
  let header = unsafe { RegionHeader::create(total, 0) }?;
  // The base is page aligned, so aligning the offset aligns the address.
  let offset = align_up(LARGE_HEADER_SIZE, align);
  Some(unsafe { header.cast::<u8>().add(offset) })
}

unsafe fn large_usable_size(ptr: *mut u8) -> usize {
  let header = RegionHeader::enclosing(ptr);
  let total = unsafe { (*header).total_bytes };
  total - (ptr.addr() - header.addr())
}

// =============================================================================
// Arena
// =============================================================================

impl Arena {
  /// Slots a fresh arena of `slot_size` will issue over its lifetime.
  const fn capacity(slot_size: usize) -> usize {
    (PAGE_SIZE - ARENA_HEADER_SIZE) / slot_size
  }

  /// Maps a one-page arena for `slot_size`-byte items.
  unsafe fn create(slot_size: usize) -> Option<NonNull<Arena>> {
    debug_assert!(
      (MIN_CLASS_SIZE..=MAX_CLASS_SIZE).contains(&slot_size),
      "Arena::create: slot size {} outside class range",
      slot_size
    );

    let arena = unsafe { RegionHeader::create(PAGE_SIZE, slot_size) }?.cast::<Arena>();
    unsafe {
      let first = arena.cast::<u8>().as_ptr().add(ARENA_HEADER_SIZE);
      let raw = arena.as_ptr();
      (*raw).live = 0;
      // The header lives in the same page, its footprint is not ours to hand out.
      (*raw).remaining = PAGE_SIZE - ARENA_HEADER_SIZE;
      (*raw).cursor = first;
    }
    Some(arena)
  }

  #[inline]
  fn slot_size(&self) -> usize {
    self.region.slot_size
  }

  #[inline]
  fn full(&self) -> bool {
    self.remaining < self.slot_size()
  }

  #[cfg(debug_assertions)]
  fn first_slot(&self) -> usize {
    (self as *const Self).addr() + ARENA_HEADER_SIZE
  }

  /// Whether `slot` is one this arena has handed out.
  #[cfg(debug_assertions)]
  fn owns(&self, slot: *mut u8) -> bool {
    let addr = slot.addr();
    let first = self.first_slot();
    addr >= first && addr < self.cursor.addr() && (addr - first) % self.slot_size() == 0
  }

  /// Hands out the slot at the cursor, then bumps it. The first call returns
  /// the slot at data offset 0.
  fn allocate(&mut self) -> Option<NonNull<u8>> {
    if self.full() {
      return None;
    }

    let slot_size = self.slot_size();
    self.remaining -= slot_size;
    self.live += 1;

    let slot = self.cursor;
    // At most one past the last slot, which is still inside the page.
    self.cursor = unsafe { slot.add(slot_size) };
    NonNull::new(slot)
  }

  /// Marks one slot freed. Returns true when the arena is drained: full and
  /// with nothing live, so its page can be unmapped.
  fn release(&mut self, slot: *mut u8) -> bool {
    #[cfg(debug_assertions)]
    {
      let arena = (self as *const Self).addr();
      if !self.owns(slot) {
        fatal(Fatal::ForeignSlot {
          slot: slot.addr(),
          arena,
          slot_size: self.slot_size(),
        });
      }
      if self.live == 0 {
        fatal(Fatal::NoLiveSlots { arena });
      }
    }

    self.live = self.live.saturating_sub(1);
    self.live == 0 && self.full()
  }
}

// =============================================================================
// Size Classes
// =============================================================================

/// Class index for a request of `bytes`: rounded up to a power of two, at
/// least 8. `None` above `MAX_CLASS_SIZE`, those go to the large path.
#[inline]
pub const fn classify(bytes: usize) -> Option<usize> {
  if bytes > MAX_CLASS_SIZE {
    return None;
  }
  let rounded = if bytes <= MIN_CLASS_SIZE {
    MIN_CLASS_SIZE
  } else {
    bytes.next_power_of_two()
  };
  Some((rounded.trailing_zeros() - MIN_CLASS_BITS) as usize)
}

/// Slot size of class `class` (inverse of `classify`).
#[inline]
pub const fn class_size(class: usize) -> usize {
  MIN_CLASS_SIZE << class
}

/// Routes requests to one open arena per size class, or to a dedicated
/// mapping above `MAX_CLASS_SIZE`.
///
/// Not synchronised. Callers sharing one instance between threads must
/// serialise access themselves; the process-wide instance behind
/// [`allocate`]/[`release`] does so with a spin lock.
pub struct SizeClassAllocator {
  /// Current open arena per class. Null until first use, and again after the
  /// arena fills up.
  arenas: [*mut Arena; CLASS_COUNT],
}

// Arenas are only reached through `&mut self`.
unsafe impl Send for SizeClassAllocator {}

impl Default for SizeClassAllocator {
  fn default() -> Self {
    Self::new()
  }
}

impl SizeClassAllocator {
  pub const fn new() -> Self {
    Self {
      arenas: [null_mut(); CLASS_COUNT],
    }
  }

  /// Returns an 8-byte aligned block of at least `bytes` bytes, or `None` if
  /// the OS refused a mapping.
  pub fn allocate(&mut self, bytes: usize) -> Option<NonNull<u8>> {
    let Some(class) = classify(bytes) else {
      return alloc_large(bytes);
    };

    let mut arena = self.arenas[class];
    if arena.is_null() {
      arena = unsafe { Arena::create(class_size(class)) }?.as_ptr();
      self.arenas[class] = arena;
    }

    let arena = unsafe { &mut *arena };
    let slot = arena.allocate();
    if slot.is_none() || arena.full() {
      // Detach. The arena lives on until its last slot is freed.
      self.arenas[class] = null_mut();
    }
    slot
  }

  /// Frees a block returned by [`SizeClassAllocator::allocate`].
  ///
  /// # Safety
  ///
  /// `ptr` must come from `allocate` on an allocator sharing this one's
  /// regions and must not have been freed already.
  pub unsafe fn free(&mut self, ptr: NonNull<u8>) {
    let ptr = ptr.as_ptr();
    let header = RegionHeader::enclosing(ptr);

    if unsafe { (*header).slot_size } == 0 {
      unsafe { RegionHeader::destroy(ptr) };
      return;
    }

    let arena = header.cast::<Arena>();
    if unsafe { (*arena).release(ptr) } {
      #[cfg(debug_assertions)]
      if self.arenas.contains(&arena) {
        fatal(Fatal::DrainedWhileCurrent {
          arena: arena.addr(),
        });
      }
      unsafe { RegionHeader::destroy(ptr) };
    }
  }

  /// Bytes usable at `ptr`: the slot size for arena blocks, the rest of the
  /// mapping for large ones.
  ///
  /// # Safety
  ///
  /// `ptr` must be a live block from `allocate`.
  pub unsafe fn usable_size(&self, ptr: NonNull<u8>) -> usize {
    let ptr = ptr.as_ptr();
    match unsafe { (*RegionHeader::enclosing(ptr)).slot_size } {
      0 => unsafe { large_usable_size(ptr) },
      slot_size => slot_size,
    }
  }
}

// =============================================================================
// Process-wide heap
// =============================================================================

struct SpinLock {
  locked: AtomicBool,
}

struct SpinGuard<'a> {
  lock: &'a SpinLock,
}

impl SpinLock {
  const fn new() -> Self {
    Self {
      locked: AtomicBool::new(false),
    }
  }

  #[inline]
  fn lock(&self) -> SpinGuard<'_> {
    while self
      .locked
      .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
      .is_err()
    {
      while self.locked.load(Ordering::Relaxed) {
        hint::spin_loop();
      }
    }
    SpinGuard { lock: self }
  }
}

impl Drop for SpinGuard<'_> {
  #[inline]
  fn drop(&mut self) {
    self.lock.locked.store(false, Ordering::Release);
  }
}

struct GlobalHeap {
  lock: SpinLock,
  engine: UnsafeCell<SizeClassAllocator>,
}

unsafe impl Sync for GlobalHeap {}

// Built at compile time: no lazy init and nothing to tear down, the OS takes
// every mapping back at exit.
static HEAP: GlobalHeap = GlobalHeap::new();

impl GlobalHeap {
  const fn new() -> Self {
    Self {
      lock: SpinLock::new(),
      engine: UnsafeCell::new(SizeClassAllocator::new()),
    }
  }

  #[inline]
  fn with<R>(&self, f: impl FnOnce(&mut SizeClassAllocator) -> R) -> R {
    let _guard = self.lock.lock();
    f(unsafe { &mut *self.engine.get() })
  }
}

/// Allocates at least `size` bytes, 8-byte aligned. A zero-byte request gets
/// the smallest class. Returns null when out of memory.
pub fn allocate(size: usize) -> *mut u8 {
  HEAP
    .with(|heap| heap.allocate(size.max(MIN_CLASS_SIZE)))
    .map_or(null_mut(), NonNull::as_ptr)
}

/// Releases a block from [`allocate`]. Null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by [`allocate`] that has not been
/// released yet. A release that would drive [`outstanding_regions`] below
/// zero aborts the process.
pub unsafe fn release(ptr: *mut u8) {
  let Some(ptr) = NonNull::new(ptr) else {
    return;
  };
  HEAP.with(|heap| unsafe { heap.free(ptr) })
}

/// Bytes usable at `ptr`, at least what was requested. 0 for null.
pub unsafe fn usable_size(ptr: *mut u8) -> usize {
  let Some(ptr) = NonNull::new(ptr) else {
    return 0;
  };
  HEAP.with(|heap| unsafe { heap.usable_size(ptr) })
}

/// Length of the mapping that holds `ptr`, header included.
pub unsafe fn region_bytes(ptr: *mut u8) -> usize {
  unsafe { (*RegionHeader::enclosing(ptr)).total_bytes }
}

// =============================================================================
// GlobalAlloc
// =============================================================================

/// Installs the process-wide heap as Rust's global allocator:
///
/// ```rust,ignore
/// #[global_allocator]
/// static GLOBAL: pagealloc::Allocator = pagealloc::Allocator;
/// ```
pub struct Allocator;

unsafe impl GlobalAlloc for Allocator {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    let size = layout.size();
    let align = layout.align();

    // Slots of class `c` start at a 64-aligned data area, so they are aligned
    // to min(64, c). Asking for a class of at least `align` is enough.
    if align <= MIN_ALIGN || (align <= ARENA_HEADER_SIZE && size <= MAX_CLASS_SIZE) {
      return allocate(size.max(align));
    }

    alloc_large_aligned(size, align).map_or(null_mut(), NonNull::as_ptr)
  }

  unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
    unsafe { release(ptr) }
  }

  unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    if new_size <= unsafe { usable_size(ptr) } {
      return ptr;
    }

    let new_ptr =
      unsafe { self.alloc(Layout::from_size_align_unchecked(new_size, layout.align())) };

    if !new_ptr.is_null() {
      unsafe { ptr::copy_nonoverlapping(ptr, new_ptr, layout.size().min(new_size)) };
      unsafe { self.dealloc(ptr, layout) };
    }

    new_ptr
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { self.alloc(layout) };
    if !ptr.is_null() {
      unsafe { ptr::write_bytes(ptr, 0, layout.size()) }
    }
    ptr
  }
}

// =============================================================================
// C API (enabled with --features c_api)
// =============================================================================

/// C callers expect `max_align_t` alignment from malloc.
#[cfg(feature = "c_api")]
const C_ALIGN: usize = 16;

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(size: usize) -> *mut u8 {
  unsafe { Allocator.alloc(Layout::from_size_align_unchecked(size, C_ALIGN)) }
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free(ptr: *mut u8) {
  unsafe { release(ptr) }
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn calloc(nmemb: usize, size: usize) -> *mut u8 {
  let Some(total) = nmemb.checked_mul(size) else {
    return null_mut();
  };
  unsafe { Allocator.alloc_zeroed(Layout::from_size_align_unchecked(total, C_ALIGN)) }
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn realloc(ptr: *mut u8, size: usize) -> *mut u8 {
  if ptr.is_null() {
    return unsafe { malloc(size) };
  }

  if size == 0 {
    unsafe { release(ptr) };
    return null_mut();
  }

  let old_size = unsafe { usable_size(ptr) };
  if size <= old_size {
    return ptr;
  }

  let new_ptr = unsafe { malloc(size) };
  if !new_ptr.is_null() {
    unsafe { ptr::copy_nonoverlapping(ptr, new_ptr, old_size) };
    unsafe { release(ptr) };
  }

  new_ptr
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn posix_memalign(
  memptr: *mut *mut u8,
  alignment: usize,
  size: usize,
) -> i32 {
  if !alignment.is_power_of_two() || alignment < core::mem::size_of::<*mut u8>() {
    return libc::EINVAL;
  }

  let ptr = unsafe { Allocator.alloc(Layout::from_size_align_unchecked(size, alignment)) };
  if ptr.is_null() {
    return libc::ENOMEM;
  }

  unsafe { *memptr = ptr };
  0
}

/// Shared by the memalign family. Invalid alignments and alignments the large
/// path cannot honour (above half a page) return null.
#[cfg(feature = "c_api")]
unsafe fn c_alloc_aligned(size: usize, alignment: usize) -> *mut u8 {
  match Layout::from_size_align(size, alignment.max(MIN_ALIGN)) {
    Ok(layout) => unsafe { Allocator.alloc(layout) },
    Err(_) => null_mut(),
  }
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn aligned_alloc(alignment: usize, size: usize) -> *mut u8 {
  unsafe { c_alloc_aligned(size, alignment) }
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn memalign(alignment: usize, size: usize) -> *mut u8 {
  unsafe { c_alloc_aligned(size, alignment) }
}

// Page-aligned payloads would start past the header's page, where rounding
// down no longer finds it. Fail instead of letting libc's heap serve them and
// hand its pointers to our `free`.
#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn valloc(_size: usize) -> *mut u8 {
  null_mut()
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pvalloc(_size: usize) -> *mut u8 {
  null_mut()
}

#[cfg(feature = "c_api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc_usable_size(ptr: *mut u8) -> usize {
  unsafe { usable_size(ptr) }
}

// =============================================================================
// Utils
// =============================================================================

/// Rounds `x` up to the next multiple of alignment `align`. Alignment must be a power of 2.
#[inline(always)]
const fn align_up(x: usize, align: usize) -> usize {
  let mask = align - 1;
  (x + mask) & !mask
}

// =============================================================================
// Tests
// =============================================================================
