//! Chunk plans: ways of splitting one input into a sequence of `feed` calls.
//!
//! Fast CI mode uses a small number of random plans when `CI` is set.
//! Set `H5STREAM_CHUNK_FUZZ_RUNS` and `H5STREAM_CHUNK_FUZZ_SEED` locally to
//! widen or reproduce the random search.

use std::fmt;
use std::sync::OnceLock;

const DEFAULT_FUZZ_RUNS_CI: usize = 16;
const DEFAULT_FUZZ_RUNS_LOCAL: usize = 64;
const DEFAULT_FUZZ_SEED: u64 = 0x6835_7374_7265_616d;
const SEED_MIX: u64 = 0x9e3779b97f4a7c15;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryPolicy {
    /// Cut points inside a UTF-8 sequence move forward to the next character.
    Utf8Aligned,
    /// Cut anywhere; the tokenizer must carry partial sequences.
    ByteStream,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Utf8Aligned => f.write_str("utf8"),
            BoundaryPolicy::ByteStream => f.write_str("bytes"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed {
        size: usize,
        policy: BoundaryPolicy,
    },
    Sizes {
        sizes: Vec<usize>,
        policy: BoundaryPolicy,
    },
    Boundaries {
        indices: Vec<usize>,
        policy: BoundaryPolicy,
    },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size, policy } => write!(f, "fixed size={size} policy={policy}"),
            ChunkPlan::Sizes { sizes, policy } => write!(
                f,
                "sizes count={} policy={policy} sizes={sizes:?}",
                sizes.len()
            ),
            ChunkPlan::Boundaries { indices, policy } => write!(
                f,
                "boundaries count={} policy={policy} indices={indices:?}",
                indices.len()
            ),
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn fixed_unaligned(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn sizes_unaligned(sizes: impl Into<Vec<usize>>) -> Self {
        Self::Sizes {
            sizes: sizes.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn boundaries_unaligned(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    fn policy(&self) -> BoundaryPolicy {
        match self {
            ChunkPlan::Fixed { policy, .. }
            | ChunkPlan::Sizes { policy, .. }
            | ChunkPlan::Boundaries { policy, .. } => *policy,
        }
    }

    /// Split `bytes` into non-empty chunks that concatenate back to `bytes`.
    pub fn split<'a>(&self, bytes: &'a [u8]) -> Vec<&'a [u8]> {
        let len = bytes.len();
        let mut points = match self {
            ChunkPlan::Fixed { size, .. } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..).map(|i| i * size).take_while(|&p| p < len).collect()
            }
            ChunkPlan::Sizes { sizes, .. } => {
                let mut offset = 0usize;
                let mut points = Vec::with_capacity(sizes.len());
                for size in sizes {
                    assert!(*size > 0, "chunk size must be > 0");
                    offset += size;
                    if offset >= len {
                        break;
                    }
                    points.push(offset);
                }
                points
            }
            ChunkPlan::Boundaries { indices, .. } => indices.clone(),
        };
        if self.policy() == BoundaryPolicy::Utf8Aligned {
            for point in &mut points {
                while *point < len && is_utf8_continuation(bytes[*point]) {
                    *point += 1;
                }
            }
        }
        points.retain(|&p| p > 0 && p < len);
        points.sort_unstable();
        points.dedup();

        let mut chunks = Vec::with_capacity(points.len() + 1);
        let mut last = 0usize;
        for point in points {
            chunks.push(&bytes[last..point]);
            last = point;
        }
        if last < len {
            chunks.push(&bytes[last..]);
        }
        chunks
    }
}

fn is_utf8_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

pub fn default_chunk_plans() -> &'static [ChunkPlan] {
    static PLANS: OnceLock<Vec<ChunkPlan>> = OnceLock::new();
    PLANS.get_or_init(|| {
        let mut plans = vec![ChunkPlan::fixed(64)];
        for size in [1usize, 2, 3, 7] {
            plans.push(ChunkPlan::fixed_unaligned(size));
        }
        plans.push(ChunkPlan::sizes_unaligned(vec![1, 1, 2, 1, 4, 8, 16, 3, 7]));
        plans.push(ChunkPlan::sizes_unaligned(vec![2, 3, 1, 5, 1, 1, 9, 2]));
        plans.push(ChunkPlan::boundaries_unaligned(vec![1, 2, 4, 5, 6, 7]));
        plans.push(ChunkPlan::boundaries(vec![3, 5]));
        plans
    })
}

/// The deterministic plans followed by the seeded random ones, each with a
/// label for failure reports.
pub fn build_chunk_plans(len: usize, salt: u64) -> Vec<(ChunkPlan, String)> {
    let mut plans: Vec<(ChunkPlan, String)> = default_chunk_plans()
        .iter()
        .map(|plan| (plan.clone(), plan.to_string()))
        .collect();
    plans.extend(fuzz_chunk_plans(len, salt));
    plans
}

/// Random boundary plans for an input of `len` bytes, each with a summary
/// that names its seed so a failure can be replayed.
pub fn fuzz_chunk_plans(len: usize, salt: u64) -> Vec<(ChunkPlan, String)> {
    let base = fuzz_seed() ^ salt;
    (0..fuzz_runs())
        .map(|iter| {
            let seed = base ^ (iter as u64).wrapping_mul(SEED_MIX);
            let mut rng = LcgRng::new(seed);
            let boundaries = random_boundaries(&mut rng, len);
            let summary = format!(
                "random boundaries count={} len={len} seed=0x{seed:016x}",
                boundaries.len()
            );
            (ChunkPlan::boundaries_unaligned(boundaries), summary)
        })
        .collect()
}

fn fuzz_runs() -> usize {
    if let Ok(value) = std::env::var("H5STREAM_CHUNK_FUZZ_RUNS")
        && let Ok(parsed) = value.parse::<usize>()
    {
        return parsed;
    }
    if std::env::var("CI").is_ok() {
        DEFAULT_FUZZ_RUNS_CI
    } else {
        DEFAULT_FUZZ_RUNS_LOCAL
    }
}

fn fuzz_seed() -> u64 {
    std::env::var("H5STREAM_CHUNK_FUZZ_SEED")
        .ok()
        .and_then(|value| {
            let value = value.trim();
            match value.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16).ok(),
                None => value.parse().ok(),
            }
        })
        .unwrap_or(DEFAULT_FUZZ_SEED)
}

fn random_boundaries(rng: &mut LcgRng, len: usize) -> Vec<usize> {
    if len <= 1 {
        return Vec::new();
    }
    let max_points = (len - 1).min(64);
    let count = rng.gen_range_usize(0, max_points + 1);
    let mut out: Vec<usize> = (0..count).map(|_| rng.gen_range_usize(1, len)).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Small deterministic generator; test plans must be reproducible from a seed.
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { SEED_MIX } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    pub fn gen_range_usize(&mut self, start: usize, end: usize) -> usize {
        assert!(start < end, "invalid range: {start}..{end}");
        let span = (end - start) as u64;
        (self.next_u64() % span) as usize + start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_reassembles_input() {
        let input = "a\u{e9}<b>\u{1F600}</b>".as_bytes();
        for plan in default_chunk_plans() {
            let chunks = plan.split(input);
            assert!(chunks.iter().all(|chunk| !chunk.is_empty()), "{plan}");
            assert_eq!(chunks.concat(), input, "{plan}");
        }
    }

    #[test]
    fn aligned_plans_never_cut_inside_a_character() {
        let input = "\u{e9}\u{e9}\u{e9}".as_bytes();
        let chunks = ChunkPlan::fixed(1).split(input);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|chunk| std::str::from_utf8(chunk).is_ok()));
    }

    #[test]
    fn unaligned_plans_cut_anywhere() {
        let input = "\u{e9}".as_bytes();
        assert_eq!(ChunkPlan::fixed_unaligned(1).split(input).len(), 2);
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = LcgRng::new(7);
        let mut b = LcgRng::new(7);
        assert_eq!(a.next_u64(), b.next_u64());
        assert_eq!(a.gen_range_usize(3, 9), b.gen_range_usize(3, 9));
    }
}
