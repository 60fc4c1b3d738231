use crate::data::variant::{Genotype, Variant};
use crate::error::Error;
use crate::io::allele::{no_call, AlleleHandle};
use log::{debug, warn};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const BED_SIGNATURE_LENGTH: usize = 3;
const BED_MAGIC: [u8; 2] = [0x6c, 0x1b];
const VARIANT_MAJOR_MODE: u8 = 0x01;
const SAMPLE_MAJOR_MODE: u8 = 0x00;
const GENOTYPES_PER_BYTE: usize = 4;

// two bit genotype codes
pub const HOM_FIRST: u8 = 0b00;
pub const MISSING: u8 = 0b01;
pub const HET: u8 = 0b10;
pub const HOM_SECOND: u8 = 0b11;

/// Storage order of the genotype matrix in a .bed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedLayout {
    /// "SNP-major": each byte holds four consecutive samples of one variant.
    VariantMajor,
    /// Each byte holds four consecutive variants of one sample.
    SampleMajor,
}

impl BedLayout {
    /// Any mode byte other than the variant-major one means sample-major.
    fn from_mode_byte(mode: u8) -> Self {
        match mode {
            VARIANT_MAJOR_MODE => Self::VariantMajor,
            SAMPLE_MAJOR_MODE => Self::SampleMajor,
            other => {
                warn!(
                    "Unexpected .bed mode byte {:#04x}; treating file as sample-major",
                    other
                );
                Self::SampleMajor
            }
        }
    }

    pub fn mode_byte(&self) -> u8 {
        match self {
            Self::VariantMajor => VARIANT_MAJOR_MODE,
            Self::SampleMajor => SAMPLE_MAJOR_MODE,
        }
    }

    pub fn signature(&self) -> [u8; BED_SIGNATURE_LENGTH] {
        [BED_MAGIC[0], BED_MAGIC[1], self.mode_byte()]
    }

    /// Returns (axis advancing within a byte, axis advancing on wrap).
    fn axis_lens(&self, num_variants: usize, num_samples: usize) -> (usize, usize) {
        match self {
            Self::VariantMajor => (num_samples, num_variants),
            Self::SampleMajor => (num_variants, num_samples),
        }
    }

    /// Number of payload bytes of a complete matrix.
    pub fn expected_payload_len(&self, num_variants: usize, num_samples: usize) -> usize {
        let (fast, slow) = self.axis_lens(num_variants, num_samples);
        fast.div_ceil(GENOTYPES_PER_BYTE) * slow
    }
}

/// Paths of the three files of a binary plink dataset.
#[derive(Debug, Clone)]
pub struct PlinkBinaryFileset {
    bed: PathBuf,
    bim: PathBuf,
    fam: PathBuf,
}

impl PlinkBinaryFileset {
    /// Derives all three paths from any one of them (or from the common stem)
    /// by swapping the extension.
    /// Only the last extension is replaced, so `a.chr1.bim` pairs with
    /// `a.chr1.bed` rather than being cut at the first dot.
    pub fn new(path: &Path) -> Self {
        Self {
            bed: path.with_extension("bed"),
            bim: path.with_extension("bim"),
            fam: path.with_extension("fam"),
        }
    }

    pub fn bed(&self) -> &Path {
        &self.bed
    }

    pub fn bim(&self) -> &Path {
        &self.bim
    }

    pub fn fam(&self) -> &Path {
        &self.fam
    }

    pub fn check_exists(&self) -> Result<(), Error> {
        for path in [&self.bed, &self.bim, &self.fam] {
            if !path.exists() {
                return Err(Error::FileNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

/// Splits a byte into its four genotype codes, lowest bits first.
pub fn unpack_byte(byte: u8) -> [u8; GENOTYPES_PER_BYTE] {
    [
        byte & 3,
        (byte & 12) >> 2,
        (byte & 48) >> 4,
        (byte & 192) >> 6,
    ]
}

/// Packs up to four genotype codes into a byte, first code in the lowest bits.
/// Unused positions stay zero.
pub fn pack_codes(codes: &[u8]) -> u8 {
    codes
        .iter()
        .take(GENOTYPES_PER_BYTE)
        .enumerate()
        .fold(0, |byte, (k, code)| byte | ((code & 3) << (2 * k)))
}

pub fn genotype_from_code(code: u8, alleles: &[AlleleHandle; 2]) -> Genotype {
    let [first, second] = alleles;
    match code {
        HOM_FIRST => [Some(first.clone()), Some(first.clone())],
        HET => [Some(first.clone()), Some(second.clone())],
        HOM_SECOND => [Some(second.clone()), Some(second.clone())],
        _ => [Some(no_call()), Some(no_call())],
    }
}

pub fn code_from_genotype(genotype: &Genotype, alleles: &[AlleleHandle; 2]) -> u8 {
    let is = |slot: &Option<AlleleHandle>, allele: &AlleleHandle| {
        slot.as_deref() == Some(allele.as_ref())
    };
    let [first, second] = alleles;
    match (&genotype[0], &genotype[1]) {
        (a, b) if is(a, first) && is(b, first) => HOM_FIRST,
        (a, b) if is(a, first) && is(b, second) => HET,
        (a, b) if is(a, second) && is(b, second) => HOM_SECOND,
        _ => MISSING,
    }
}

/// Position in the genotype matrix.
/// The layout decides which index moves per genotype code and which one per wrap.
struct MatrixCursor {
    layout: BedLayout,
    num_variants: usize,
    num_samples: usize,
    variant_ix: usize,
    sample_ix: usize,
}

impl MatrixCursor {
    fn new(layout: BedLayout, num_variants: usize, num_samples: usize) -> Self {
        Self {
            layout,
            num_variants,
            num_samples,
            variant_ix: 0,
            sample_ix: 0,
        }
    }

    fn axis_lens(&self) -> (usize, usize) {
        self.layout.axis_lens(self.num_variants, self.num_samples)
    }

    fn is_done(&self) -> bool {
        let (fast_len, slow_len) = self.axis_lens();
        let slow_ix = match self.layout {
            BedLayout::VariantMajor => self.variant_ix,
            BedLayout::SampleMajor => self.sample_ix,
        };
        fast_len == 0 || slow_ix >= slow_len
    }

    /// Variant receiving the `k`-th code of the current byte,
    /// `None` if that code is padding.
    fn target_variant(&self, k: usize) -> Option<usize> {
        let (fast_len, _) = self.axis_lens();
        match self.layout {
            BedLayout::VariantMajor if self.sample_ix + k < fast_len => Some(self.variant_ix),
            BedLayout::SampleMajor if self.variant_ix + k < fast_len => Some(self.variant_ix + k),
            _ => None,
        }
    }

    fn next_byte(&mut self) {
        let (fast_len, _) = self.axis_lens();
        let (fast, slow) = match self.layout {
            BedLayout::VariantMajor => (&mut self.sample_ix, &mut self.variant_ix),
            BedLayout::SampleMajor => (&mut self.variant_ix, &mut self.sample_ix),
        };
        *fast += GENOTYPES_PER_BYTE;
        if *fast >= fast_len {
            *slow += 1;
            *fast = 0;
        }
    }
}

/// Summary of a decoded .bed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedDecodeReport {
    pub layout: BedLayout,
    /// payload bytes found after the signature
    pub payload_len: usize,
    /// payload bytes of a complete matrix
    pub expected_payload_len: usize,
}

impl BedDecodeReport {
    pub fn is_complete(&self) -> bool {
        self.payload_len == self.expected_payload_len
    }
}

/// Reads a .bed stream and appends the decoded genotypes to `variants`,
/// which have to be in .bim order.
///
/// The stream is not required to match the expected size: decoding stops
/// at the end of the stream or of the matrix, whichever comes first.
pub fn decode_bed<R: Read>(
    mut reader: R,
    path: &Path,
    variants: &mut [Variant],
    num_samples: usize,
) -> Result<BedDecodeReport, Error> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::io(path, e))?;

    if data.len() < BED_SIGNATURE_LENGTH {
        warn!(
            "{:?} is shorter than the .bed signature, no genotypes decoded",
            path
        );
        return Ok(BedDecodeReport {
            layout: BedLayout::VariantMajor,
            payload_len: 0,
            expected_payload_len: BedLayout::VariantMajor
                .expected_payload_len(variants.len(), num_samples),
        });
    }
    if data[..2] != BED_MAGIC {
        warn!("{:?} does not start with the .bed magic number", path);
    }
    let layout = BedLayout::from_mode_byte(data[2]);
    let payload = &data[BED_SIGNATURE_LENGTH..];
    debug!(
        "Decoding {} payload bytes of {:?} ({:?})",
        payload.len(),
        path,
        layout
    );

    let mut cursor = MatrixCursor::new(layout, variants.len(), num_samples);
    let mut consumed = 0;
    for &byte in payload {
        if cursor.is_done() {
            break;
        }
        for (k, code) in unpack_byte(byte).into_iter().enumerate() {
            let Some(variant_ix) = cursor.target_variant(k) else {
                break;
            };
            let variant = &mut variants[variant_ix];
            let genotype = match variant.declared_alleles() {
                Some(alleles) => genotype_from_code(code, alleles),
                None => [Some(no_call()), Some(no_call())],
            };
            variant.push_genotype(genotype);
        }
        cursor.next_byte();
        consumed += 1;
    }
    if consumed < payload.len() {
        warn!(
            "Ignoring {} bytes past the end of the genotype matrix in {:?}",
            payload.len() - consumed,
            path
        );
    }

    Ok(BedDecodeReport {
        layout,
        payload_len: payload.len(),
        expected_payload_len: layout.expected_payload_len(variants.len(), num_samples),
    })
}

/// Packs the genotypes of `variants` (in .bim order) into a .bed payload,
/// without the signature.
/// Genotypes that are absent or do not match the declared alleles are
/// encoded as missing.
pub fn encode_payload(variants: &[Variant], num_samples: usize, layout: BedLayout) -> Vec<u8> {
    let code_at = |variant_ix: usize, sample_ix: usize| {
        let variant = &variants[variant_ix];
        match (variant.declared_alleles(), variant.genotype(sample_ix)) {
            (Some(alleles), Some(genotype)) => code_from_genotype(genotype, alleles),
            _ => MISSING,
        }
    };
    let (fast_len, slow_len) = layout.axis_lens(variants.len(), num_samples);
    let mut res = Vec::with_capacity(layout.expected_payload_len(variants.len(), num_samples));
    let mut codes = Vec::with_capacity(GENOTYPES_PER_BYTE);
    for slow in 0..slow_len {
        for start in (0..fast_len).step_by(GENOTYPES_PER_BYTE) {
            codes.clear();
            for fast in start..(start + GENOTYPES_PER_BYTE).min(fast_len) {
                codes.push(match layout {
                    BedLayout::VariantMajor => code_at(slow, fast),
                    BedLayout::SampleMajor => code_at(fast, slow),
                });
            }
            res.push(pack_codes(&codes));
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::allele::Allele;
    use crate::io::bim::BimEntry;
    use crate::io::indexed_read::IndexedEntry;
    use std::io::Cursor;

    const BIM_ROWS: [&str; 3] = ["1 rs1 0 500 A G", "2 rs2 0 100 C T", "1 rs3 0 200 G T"];
    // codes per variant (rows) and sample (columns)
    const CODES: [[u8; 5]; 3] = [[3, 2, 0, 0, 1], [0, 0, 2, 3, 3], [3, 3, 1, 0, 2]];
    const VARIANT_MAJOR_BED: [u8; 9] = [0x6c, 0x1b, 0x01, 0x0b, 0x01, 0xe0, 0x03, 0x1f, 0x02];
    const SAMPLE_MAJOR_BED: [u8; 8] = [0x6c, 0x1b, 0x00, 0x33, 0x32, 0x18, 0x0c, 0x2d];

    fn make_variants(rows: &[&str]) -> Vec<Variant> {
        rows.iter()
            .enumerate()
            .map(|(ix, row)| Variant::from_bim(BimEntry::from_str(row, ix).unwrap()))
            .collect()
    }

    fn decoded_codes(variants: &[Variant]) -> Vec<Vec<u8>> {
        variants
            .iter()
            .map(|v| {
                v.genotypes()
                    .iter()
                    .map(|g| code_from_genotype(g, v.declared_alleles().unwrap()))
                    .collect()
            })
            .collect()
    }

    fn calls(variant: &Variant) -> Vec<String> {
        variant
            .genotypes()
            .iter()
            .map(|g| format!("{}{}", g[0].as_ref().unwrap(), g[1].as_ref().unwrap()))
            .collect()
    }

    #[test]
    fn unpack_low_bits_first() {
        assert_eq!(unpack_byte(0b00_00_10_11), [3, 2, 0, 0]);
        assert_eq!(unpack_byte(0b01_11_00_10), [2, 0, 3, 1]);
        assert_eq!(pack_codes(&[3, 2, 0, 0]), 0b00_00_10_11);
        assert_eq!(pack_codes(&[2]), 0b10);
    }

    #[test]
    fn single_byte_variant_major() {
        let mut variants = make_variants(&["1 rsX 0 500 A G"]);
        let bed = [0x6cu8, 0x1b, 0x01, 0b00_00_10_11];
        let report = decode_bed(Cursor::new(bed), Path::new("x.bed"), &mut variants, 4).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.layout, BedLayout::VariantMajor);
        assert_eq!(calls(&variants[0]), vec!["GG", "AG", "AA", "AA"]);
    }

    #[test]
    fn variant_major_with_padding() {
        let mut variants = make_variants(&BIM_ROWS);
        let report = decode_bed(
            Cursor::new(VARIANT_MAJOR_BED),
            Path::new("small.bed"),
            &mut variants,
            5,
        )
        .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.expected_payload_len, 6);
        assert_eq!(decoded_codes(&variants), CODES.map(|c| c.to_vec()).to_vec());
        assert_eq!(calls(&variants[0]), vec!["GG", "AG", "AA", "AA", ".."]);
        assert_eq!(calls(&variants[2]), vec!["TT", "TT", "..", "GG", "GT"]);
    }

    #[test]
    fn no_call_first_allele_uses_second() {
        let mut variants = make_variants(&["1 rs3 0 200 0 T"]);
        let bed = [0x6cu8, 0x1b, 0x01, 0b00_01_10_11];
        decode_bed(Cursor::new(bed), Path::new("mono.bed"), &mut variants, 4).unwrap();
        assert_eq!(calls(&variants[0]), vec!["TT", "TT", "..", "TT"]);
    }

    #[test]
    fn sample_major_matches_variant_major() {
        let mut variants = make_variants(&BIM_ROWS);
        let report = decode_bed(
            Cursor::new(SAMPLE_MAJOR_BED),
            Path::new("small_sm.bed"),
            &mut variants,
            5,
        )
        .unwrap();
        assert_eq!(report.layout, BedLayout::SampleMajor);
        assert!(report.is_complete());
        assert_eq!(decoded_codes(&variants), CODES.map(|c| c.to_vec()).to_vec());
        assert!(variants.iter().all(|v| v.num_genotypes() == 5));
    }

    #[test]
    fn unknown_mode_byte_and_bad_magic_read_as_sample_major() {
        let mut bed = SAMPLE_MAJOR_BED;
        bed[0] = 0x00;
        bed[1] = 0xff;
        bed[2] = 0x07;
        let mut variants = make_variants(&BIM_ROWS);
        let report =
            decode_bed(Cursor::new(bed), Path::new("odd.bed"), &mut variants, 5).unwrap();
        assert_eq!(report.layout, BedLayout::SampleMajor);
        assert!(report.is_complete());
        assert_eq!(decoded_codes(&variants), CODES.map(|c| c.to_vec()).to_vec());
        let payload = encode_payload(&variants, 5, report.layout);
        assert_eq!(payload, SAMPLE_MAJOR_BED[BED_SIGNATURE_LENGTH..]);
    }

    #[test]
    fn truncated_stream_is_partial() {
        let mut variants = make_variants(&BIM_ROWS);
        let report = decode_bed(
            Cursor::new(&VARIANT_MAJOR_BED[..6]),
            Path::new("trunc.bed"),
            &mut variants,
            5,
        )
        .unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.payload_len, 3);
        let counts: Vec<usize> = variants.iter().map(|v| v.num_genotypes()).collect();
        assert_eq!(counts, vec![5, 4, 0]);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut variants = make_variants(&BIM_ROWS);
        let mut bed = VARIANT_MAJOR_BED.to_vec();
        bed.extend_from_slice(&[0xff, 0xff]);
        let report =
            decode_bed(Cursor::new(bed), Path::new("long.bed"), &mut variants, 5).unwrap();
        assert_eq!(report.payload_len, 8);
        assert!(!report.is_complete());
        assert_eq!(decoded_codes(&variants), CODES.map(|c| c.to_vec()).to_vec());
    }

    #[test]
    fn short_header_decodes_nothing() {
        let mut variants = make_variants(&BIM_ROWS);
        let report =
            decode_bed(Cursor::new([0x6cu8]), Path::new("tiny.bed"), &mut variants, 5).unwrap();
        assert_eq!(report.payload_len, 0);
        assert!(variants.iter().all(|v| v.num_genotypes() == 0));
    }

    #[test]
    fn no_samples_decodes_nothing() {
        let mut variants = make_variants(&BIM_ROWS);
        let report = decode_bed(
            Cursor::new([0x6cu8, 0x1b, 0x01, 0xff]),
            Path::new("empty.bed"),
            &mut variants,
            0,
        )
        .unwrap();
        assert_eq!(report.expected_payload_len, 0);
        assert!(variants.iter().all(|v| v.num_genotypes() == 0));
    }

    #[test]
    fn payload_round_trip() {
        for (bed, layout) in [
            (VARIANT_MAJOR_BED.to_vec(), BedLayout::VariantMajor),
            (SAMPLE_MAJOR_BED.to_vec(), BedLayout::SampleMajor),
        ] {
            let mut variants = make_variants(&BIM_ROWS);
            decode_bed(Cursor::new(&bed), Path::new("rt.bed"), &mut variants, 5).unwrap();
            let payload = encode_payload(&variants, 5, layout);
            assert_eq!(payload, bed[BED_SIGNATURE_LENGTH..]);
            assert_eq!(layout.signature(), bed[..BED_SIGNATURE_LENGTH]);
        }
    }

    #[test]
    fn het_with_missing_second_allele() {
        let alleles = make_variants(&["1 rs9 0 10 A 0"])[0]
            .declared_alleles()
            .unwrap()
            .clone();
        let het = genotype_from_code(HET, &alleles);
        assert_eq!(het[0].as_deref(), Some(&Allele::Called("A".into())));
        assert!(het[1].as_ref().unwrap().is_no_call());
    }

    #[test]
    fn fileset_from_any_member() {
        let from_bim = PlinkBinaryFileset::new(Path::new("/data/cohort.chr1.bim"));
        assert_eq!(from_bim.bed(), Path::new("/data/cohort.chr1.bed"));
        assert_eq!(from_bim.fam(), Path::new("/data/cohort.chr1.fam"));
        let from_stem = PlinkBinaryFileset::new(Path::new("/data/cohort"));
        assert_eq!(from_stem.bim(), Path::new("/data/cohort.bim"));
    }
}
