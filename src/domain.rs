pub mod activity;
pub mod astro;
pub mod weather;
