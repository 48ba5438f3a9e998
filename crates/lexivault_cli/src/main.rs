//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lexivault_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("lexivault_core ping={}", lexivault_core::ping());
    println!("lexivault_core version={}", lexivault_core::core_version());
}
