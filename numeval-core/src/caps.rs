//! SIMD capabilities: what this build compiled in, and what the CPU reports.
//!
//! Dispatch only ever looks at [`BUILD`]. The instruction sets are fixed when
//! the crate is compiled (see `build.rs`), so a kind is either compiled in for
//! every call or for none. [`detect`] exists for diagnostics: it reports the
//! running CPU and warns once if the binary was built for features the CPU
//! lacks.

use std::fmt;
use std::sync::OnceLock;

use crate::simd::{Avx, SimdKind, Sse};

/// Kinds compiled into this build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildCaps {
    pub sse: bool,
    pub avx: bool,
}

/// Compile-time capability set.
pub const BUILD: BuildCaps = BuildCaps {
    sse: Sse::AVAILABLE,
    avx: Avx::AVAILABLE,
};

impl BuildCaps {
    /// Widest f64 pack width available (1 when only scalar).
    pub const fn f64_width(&self) -> usize {
        if self.avx {
            4
        } else if self.sse {
            2
        } else {
            1
        }
    }

    /// Widest f32 pack width available (1 when only scalar).
    pub const fn f32_width(&self) -> usize {
        self.f64_width() * 2 - (self.f64_width() == 1) as usize
    }
}

impl fmt::Display for BuildCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sse, self.avx) {
            (_, true) => f.write_str("sse+avx"),
            (true, false) => f.write_str("sse"),
            (false, false) => f.write_str("scalar"),
        }
    }
}

/// Instruction sets reported by the running CPU.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeCaps {
    pub sse2: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
    pub num_cores: usize,
}

static CAPS: OnceLock<RuntimeCaps> = OnceLock::new();

/// Detect runtime capabilities (cached after first call).
pub fn detect() -> &'static RuntimeCaps {
    CAPS.get_or_init(|| {
        let caps = query_cpu();
        if BUILD.sse && !caps.sse2 {
            log::warn!("numeval built with sse packs but the CPU does not report sse2");
        }
        if BUILD.avx && !caps.avx {
            log::warn!("numeval built with avx packs but the CPU does not report avx");
        }
        log::debug!("runtime caps: {caps:?}, build kinds: {BUILD}");
        caps
    })
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn query_cpu() -> RuntimeCaps {
    RuntimeCaps {
        sse2: is_x86_feature_detected!("sse2"),
        avx: is_x86_feature_detected!("avx"),
        avx2: is_x86_feature_detected!("avx2"),
        fma: is_x86_feature_detected!("fma"),
        num_cores: num_cores(),
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn query_cpu() -> RuntimeCaps {
    RuntimeCaps {
        num_cores: num_cores(),
        ..RuntimeCaps::default()
    }
}

fn num_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// One-line summary for logs and bench headers.
pub fn describe() -> String {
    let caps = detect();
    format!(
        "build={} cpu[sse2={} avx={} avx2={} fma={}] cores={}",
        BUILD, caps.sse2, caps.avx, caps.avx2, caps.fma, caps.num_cores
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_caps_consistent() {
        // avx implies sse in build.rs
        assert!(!BUILD.avx || BUILD.sse);
        match BUILD.f64_width() {
            1 => assert_eq!(BUILD.f32_width(), 1),
            w => assert_eq!(BUILD.f32_width(), 2 * w),
        }
    }

    #[test]
    fn test_detect_cached() {
        let a = detect() as *const RuntimeCaps;
        let b = detect() as *const RuntimeCaps;
        assert_eq!(a, b);
        assert!(detect().num_cores >= 1);
    }

    #[test]
    fn test_build_runs_on_host() {
        let caps = detect();
        if BUILD.sse {
            assert!(caps.sse2);
        }
        if BUILD.avx {
            assert!(caps.avx);
        }
    }

    #[test]
    fn test_describe() {
        let s = describe();
        assert!(s.starts_with("build="));
        assert!(s.contains("cores="));
    }
}
