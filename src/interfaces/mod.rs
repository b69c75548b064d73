//! Presentation boundary. Core types carry integer minor-unit amounts;
//! formatting for humans happens here and only here.

pub mod display;
