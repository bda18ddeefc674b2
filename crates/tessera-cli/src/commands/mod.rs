pub mod oat;
pub mod spt;
