//! Waveform selection and sample table generation
//!
//! One period of each waveform is held as a table of `TABLE_LEN` words,
//! already shifted into the VALUE field of the DAC converter register so the
//! ring transfer can write table entries to DACR verbatim. The square and
//! triangle tables are computed once at startup; the sine table is a
//! compiled-in constant.

/// Period resolution of every sample table, in points.
pub const TABLE_LEN: usize = 382;

/// Highest code of the 10-bit converter.
pub const MAX_CODE: u32 = 1023;

/// Lowest code of the 10-bit converter.
pub const MIN_CODE: u32 = 0;

/// Offset of the VALUE field within DACR.
pub const DAC_SHIFT: u32 = 6;

/// Output waveform selection, cycled by the shape-select line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
}

impl Waveform {
    /// Advances the selection circularly.
    pub fn next(self) -> Waveform {
        match self {
            Waveform::Square => Waveform::Triangle,
            Waveform::Triangle => Waveform::Sine,
            Waveform::Sine => Waveform::Square,
        }
    }
}

/// Fills `buf` with one square period: first half at the maximum code,
/// second half at the minimum code.
pub fn fill_square(buf: &mut [u32]) {
    let half = buf.len() / 2;
    for (i, sample) in buf.iter_mut().enumerate() {
        let code = if i < half { MAX_CODE } else { MIN_CODE };
        *sample = code << DAC_SHIFT;
    }
}

/// Fills `buf` with one triangle period as four linear ramp segments:
/// midpoint up to the peak, down to the midpoint, down to the minimum and
/// back up to the midpoint. The segments span a quarter of the table each;
/// the division remainder is absorbed by the last segment.
pub fn fill_triangle(buf: &mut [u32]) {
    let quarter = buf.len() / 4;
    let last = buf.len() - 3 * quarter;
    let mid = (MIN_CODE + MAX_CODE) as f32 / 2.0;
    let segments = [
        (mid, MAX_CODE as f32, quarter),
        (MAX_CODE as f32, mid, quarter),
        (mid, MIN_CODE as f32, quarter),
        (MIN_CODE as f32, mid, last),
    ];

    let mut i = 0;
    for &(from, to, points) in segments.iter() {
        for k in 0..points {
            let v = from + (to - from) * (k as f32 / points as f32);
            // v is never negative, so +0.5 truncation rounds to nearest
            buf[i] = ((v + 0.5) as u32) << DAC_SHIFT;
            i += 1;
        }
    }
}

/// Sample tables for the generated waveforms, one period each.
///
/// Exactly one table is bound to the ring transfer at a time; the store
/// itself is immutable after generation, which must happen before any of
/// the control interrupts is unmasked.
pub struct WaveTables {
    square: [u32; TABLE_LEN],
    triangle: [u32; TABLE_LEN],
}

impl WaveTables {
    /// Computes the square and triangle tables. Pure computation, runs once.
    pub fn generate() -> WaveTables {
        let mut tables = WaveTables {
            square: [0; TABLE_LEN],
            triangle: [0; TABLE_LEN],
        };
        fill_square(&mut tables.square);
        fill_triangle(&mut tables.triangle);
        tables
    }

    /// The table holding one period of `waveform`.
    pub fn table(&self, waveform: Waveform) -> &[u32; TABLE_LEN] {
        match waveform {
            Waveform::Square => &self.square,
            Waveform::Triangle => &self.triangle,
            Waveform::Sine => &SINE,
        }
    }
}

/// One period of a 10-bit sine, pre-shifted into the DACR VALUE field.
pub static SINE: [u32; TABLE_LEN] = [
    32768, 33280, 33792, 34368, 34880, 35456, 35968, 36480, 37056, 37568, 38080, 38656,
    39168, 39680, 40192, 40704, 41280, 41792, 42304, 42816, 43328, 43840, 44352, 44800,
    45312, 45824, 46336, 46784, 47296, 47744, 48256, 48704, 49152, 49664, 50112, 50560,
    51008, 51456, 51904, 52352, 52736, 53184, 53568, 54016, 54400, 54784, 55232, 55616,
    56000, 56384, 56704, 57088, 57472, 57792, 58112, 58496, 58816, 59136, 59456, 59776,
    60032, 60352, 60608, 60928, 61184, 61440, 61696, 61952, 62208, 62400, 62656, 62848,
    63040, 63232, 63424, 63616, 63808, 64000, 64128, 64256, 64384, 64576, 64640, 64768,
    64896, 64960, 65088, 65152, 65216, 65280, 65344, 65408, 65408, 65472, 65472, 65472,
    65472, 65472, 65472, 65408, 65408, 65344, 65280, 65216, 65152, 65088, 64960, 64896,
    64768, 64640, 64576, 64384, 64256, 64128, 64000, 63808, 63616, 63424, 63232, 63040,
    62848, 62656, 62400, 62208, 61952, 61696, 61440, 61184, 60928, 60608, 60352, 60032,
    59776, 59456, 59136, 58816, 58496, 58112, 57792, 57472, 57088, 56704, 56384, 56000,
    55616, 55232, 54784, 54400, 54016, 53568, 53184, 52736, 52352, 51904, 51456, 51008,
    50560, 50112, 49664, 49152, 48704, 48256, 47744, 47296, 46784, 46336, 45824, 45312,
    44800, 44352, 43840, 43328, 42816, 42304, 41792, 41280, 40704, 40192, 39680, 39168,
    38656, 38080, 37568, 37056, 36480, 35968, 35456, 34880, 34368, 33792, 33280, 32768,
    32192, 31680, 31104, 30592, 30016, 29504, 28992, 28416, 27904, 27392, 26816, 26304,
    25792, 25280, 24768, 24192, 23680, 23168, 22656, 22144, 21632, 21120, 20672, 20160,
    19648, 19136, 18688, 18176, 17728, 17216, 16768, 16320, 15808, 15360, 14912, 14464,
    14016, 13568, 13120, 12736, 12288, 11904, 11456, 11072, 10688, 10240,  9856,  9472,
     9088,  8768,  8384,  8000,  7680,  7360,  6976,  6656,  6336,  6016,  5696,  5440,
     5120,  4864,  4544,  4288,  4032,  3776,  3520,  3264,  3072,  2816,  2624,  2432,
     2240,  2048,  1856,  1664,  1472,  1344,  1216,  1088,   896,   832,   704,   576,
      512,   384,   320,   256,   192,   128,    64,    64,     0,     0,     0,     0,
        0,     0,    64,    64,   128,   192,   256,   320,   384,   512,   576,   704,
      832,   896,  1088,  1216,  1344,  1472,  1664,  1856,  2048,  2240,  2432,  2624,
     2816,  3072,  3264,  3520,  3776,  4032,  4288,  4544,  4864,  5120,  5440,  5696,
     6016,  6336,  6656,  6976,  7360,  7680,  8000,  8384,  8768,  9088,  9472,  9856,
    10240, 10688, 11072, 11456, 11904, 12288, 12736, 13120, 13568, 14016, 14464, 14912,
    15360, 15808, 16320, 16768, 17216, 17728, 18176, 18688, 19136, 19648, 20160, 20672,
    21120, 21632, 22144, 22656, 23168, 23680, 24192, 24768, 25280, 25792, 26304, 26816,
    27392, 27904, 28416, 28992, 29504, 30016, 30592, 31104, 31680, 32192,
];
