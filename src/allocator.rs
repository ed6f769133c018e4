//! Global allocator for the `sigcrypt` binary.
//!
//! The library leaves allocator choice to its users; the CLI opts into
//! mimalloc for its many short-lived buffers (base64 text, padded blocks,
//! hex digests).

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
