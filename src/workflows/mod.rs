pub mod guidance;
