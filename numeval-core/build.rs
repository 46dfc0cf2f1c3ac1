//! Build script for numeval-core.
//!
//! Resolves which SIMD kinds this build can use and exposes them as cfgs:
//! - `numeval_sse`: cargo feature `sse` on and the target enables `sse2`
//! - `numeval_avx`: `numeval_sse`, cargo feature `avx` on and the target enables `avx`
//!
//! Kinds that are not enabled here never get a pack type, so the dispatch
//! layer cannot select them.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-check-cfg=cfg(numeval_sse)");
    println!("cargo:rustc-check-cfg=cfg(numeval_avx)");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let has = |name: &str| target_features.split(',').any(|f| f == name);

    let x86 = arch == "x86" || arch == "x86_64";
    let sse = x86 && env::var_os("CARGO_FEATURE_SSE").is_some() && has("sse2");
    let avx = sse && env::var_os("CARGO_FEATURE_AVX").is_some() && has("avx");

    if sse {
        println!("cargo:rustc-cfg=numeval_sse");
    }
    if avx {
        println!("cargo:rustc-cfg=numeval_avx");
    }
}
