pub mod district;
pub mod record;
