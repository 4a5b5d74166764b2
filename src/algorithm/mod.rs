/// Growable byte buffer for pattern accumulation
pub mod buffer;
/// Generic sorting and k-th order selection
pub mod order;
/// Worker pool with shared job cursor and fail-fast abort
pub mod pool;
