pub mod looping;
pub mod ring_buffer;
