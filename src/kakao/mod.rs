pub mod client;

pub use client::KakaoGeocoder;
