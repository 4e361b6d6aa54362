//! End-to-end tests for the CCITT codec.

use oxifax_ccitt::{
    Coding, EncodeOptions, ErrorPolicy, FaxDecoder, FaxEncoder, FaxError, FaxOptions, FillOrder,
    G3Options, StopReason, decode, encode,
};

/// Deterministic bi-level image with runs of varied length.
fn scanned_page(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let stride = width.div_ceil(8);
    let mut data = vec![0u8; stride * height];
    let mut state = seed;
    for y in 0..height {
        let mut x = 0;
        let mut black = false;
        while x < width {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let run = 1 + ((state >> 16) as usize % if black { 12 } else { 90 });
            let end = (x + run).min(width);
            if black {
                for px in x..end {
                    data[y * stride + px / 8] |= 0x80 >> (px % 8);
                }
            }
            x = end;
            black = !black;
        }
    }
    data
}

fn bits(pattern: &str) -> Vec<u8> {
    let clean: Vec<bool> = pattern
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c == '1')
        .collect();
    clean
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | (u8::from(bit) << (7 - i)))
        })
        .collect()
}

#[test]
fn test_roundtrip_scanned_page() {
    let (width, height) = (1728, 64);
    let page = scanned_page(width, height, 7);
    for coding in [Coding::Group3OneD, Coding::Group3TwoD, Coding::Group4] {
        let options = EncodeOptions::new(width, coding);
        let coded = encode(&page, options).unwrap();
        assert!(coded.len() < page.len(), "{coding:?} should compress");
        let (decoded, report) = decode(&coded, options.decode_options(), height).unwrap();
        assert_eq!(decoded, page, "{coding:?}");
        assert_eq!(report.rows_decoded, height);
    }
}

#[test]
fn test_roundtrip_long_runs() {
    // Runs beyond 2560 need repeated makeup codes.
    let width = 6000;
    let stride = width / 8;
    let mut page = vec![0u8; stride * 3];
    page[stride..2 * stride].fill(0xFF);
    page[2 * stride + 400] = 0x18;
    for coding in [Coding::Group3OneD, Coding::Group4] {
        let options = EncodeOptions::new(width, coding);
        let coded = encode(&page, options).unwrap();
        let (decoded, _) = decode(&coded, options.decode_options(), 3).unwrap();
        assert_eq!(decoded, page, "{coding:?}");
    }
}

#[test]
fn test_roundtrip_odd_width_ignores_padding() {
    let width = 13;
    let page = vec![0b1010_1010, 0b1111_1111, 0b0000_0111, 0b1111_1000];
    let options = EncodeOptions::new(width, Coding::Group4);
    let coded = encode(&page, options).unwrap();
    let (decoded, _) = decode(&coded, options.decode_options(), 2).unwrap();
    // The three padding bits of each row come back clear.
    assert_eq!(decoded, vec![0b1010_1010, 0b1111_1000, 0b0000_0111, 0b1111_1000]);
}

#[test]
fn test_all_white_1d_line() {
    // Makeup 1728 + terminating white 0.
    let data = bits("010011011 00110101");
    let options = FaxOptions::new(1728, Coding::Group3OneD);
    let (decoded, report) = decode(&data, options, 1).unwrap();
    assert!(decoded.iter().all(|&b| b == 0));
    assert_eq!(report.rows_decoded, 1);
}

#[test]
fn test_group4_pass_mode() {
    // Reference row: white 0..10, black 10..12, white 12..16.
    let reference = bits("001 00111 11 1");
    let pass = bits("0001 1");
    let mut decoder = FaxDecoder::new(FaxOptions::new(16, Coding::Group4)).unwrap();
    let (row, _) = decoder.decode(&reference, 1).unwrap();
    assert_eq!(row, vec![0b0000_0000, 0b0011_0000]);
    let (row, report) = decoder.decode(&pass, 1).unwrap();
    assert_eq!(row, vec![0, 0]);
    assert_eq!(report.rows_decoded, 1);
}

#[test]
fn test_tolerant_decode_skips_corrupted_row() {
    let width = 64;
    let page = scanned_page(width, 9, 3);
    let options = EncodeOptions::new(width, Coding::Group3OneD);
    let coded = encode(&page, options).unwrap();

    // An EOL followed by a code no table contains, in front of nine good rows.
    let mut corrupted = vec![0x00, 0x10, 0x04];
    corrupted.extend_from_slice(&coded);

    let decode_options = options
        .decode_options()
        .with_policy(ErrorPolicy::Tolerant);
    let (decoded, report) = decode(&corrupted, decode_options, 10).unwrap();
    let stride = width / 8;
    assert!(decoded[..stride].iter().all(|&b| b == 0));
    assert_eq!(&decoded[stride..], &page[..]);
    assert_eq!(report.failed_rows, vec![0]);
    assert_eq!(report.failure_count(), 1);

    let strict = options.decode_options();
    assert!(matches!(
        decode(&corrupted, strict, 10),
        Err(FaxError::MalformedCode { row: 0, .. })
    ));
}

#[test]
fn test_tolerant_decode_recovers_from_eol_inside_line() {
    let width = 64;
    let page = scanned_page(width, 6, 13);
    let options = EncodeOptions::new(width, Coding::Group3OneD);
    let coded = encode(&page, options).unwrap();

    // An EOL and a white run of 2, cut off by the EOL that opens the page.
    let mut corrupted = vec![0x00, 0x17];
    corrupted.extend_from_slice(&coded);

    let decode_options = options
        .decode_options()
        .with_policy(ErrorPolicy::Tolerant);
    let (decoded, report) = decode(&corrupted, decode_options, 7).unwrap();
    let stride = width / 8;
    assert!(decoded[..stride].iter().all(|&b| b == 0));
    assert_eq!(&decoded[stride..], &page[..]);
    assert_eq!(report.failed_rows, vec![0]);
    assert_eq!(report.rows_decoded, 6);

    assert!(matches!(
        decode(&corrupted, options.decode_options(), 7),
        Err(FaxError::PrematureEol { row: 0, bit_position: 16 })
    ));
}

#[test]
fn test_tolerant_2d_waits_for_1d_line() {
    let width = 64;
    let page = scanned_page(width, 8, 11);
    let options = EncodeOptions::new(width, Coding::Group3TwoD)
        .with_g3_options(G3Options::FILL_BITS)
        .with_k(4);
    let mut coded = encode(&page, options).unwrap();
    // With fill bits every EOL ends a byte: row 1's EOL is the first byte
    // 0x01 after eleven zero bits.
    let eol_end = (3..coded.len())
        .find(|&i| coded[i] == 0x01 && coded[i - 1] & 0x0F == 0)
        .unwrap();
    assert!(eol_end >= 5);
    // Row 0: EOL ends at bit 16, tag bit 16, codes from bit 17. Replace the
    // codes with `000000000100`, which no table contains, and ones.
    coded[2] = 0b1000_0000;
    coded[3] = 0b0010_0111;
    coded[4..eol_end - 1].fill(0xFF);
    coded[eol_end - 1] = 0x00;

    let decode_options = options
        .decode_options()
        .with_policy(ErrorPolicy::Tolerant);
    let (decoded, report) = decode(&coded, decode_options, 8).unwrap();
    // Rows 1..4 are 2D-coded against the lost row and are skipped too.
    assert_eq!(report.failed_rows, vec![0, 1, 2, 3]);
    let stride = width / 8;
    assert!(decoded[..4 * stride].iter().all(|&b| b == 0));
    assert_eq!(&decoded[4 * stride..], &page[4 * stride..]);
}

#[test]
fn test_lsb_fill_order() {
    let page = scanned_page(96, 6, 5);
    let options = EncodeOptions::new(96, Coding::Group4).with_fill_order(FillOrder::LsbToMsb);
    let coded = encode(&page, options).unwrap();
    let msb_options = EncodeOptions::new(96, Coding::Group4);
    let msb = encode(&page, msb_options).unwrap();
    let reversed: Vec<u8> = msb.iter().map(|b| b.reverse_bits()).collect();
    assert_eq!(coded, reversed);

    let (decoded, _) = decode(&coded, options.decode_options(), 6).unwrap();
    assert_eq!(decoded, page);
}

#[test]
fn test_byte_aligned_rows_without_eols() {
    // TIFF compression 2: Modified Huffman, rows byte aligned, no EOLs.
    let page = scanned_page(40, 5, 9);
    let options = EncodeOptions::new(40, Coding::Group3OneD)
        .with_eols(false)
        .with_byte_alignment(true);
    let coded = encode(&page, options).unwrap();
    let (decoded, report) = decode(&coded, options.decode_options(), 5).unwrap();
    assert_eq!(decoded, page);
    assert_eq!(report.rows_decoded, 5);

    let options = EncodeOptions::new(40, Coding::Group4)
        .with_byte_alignment(true)
        .with_end_marker(false);
    let coded = encode(&page, options).unwrap();
    let (decoded, _) = decode(&coded, options.decode_options(), 5).unwrap();
    assert_eq!(decoded, page);
}

#[test]
fn test_fill_bits_roundtrip() {
    let page = scanned_page(200, 12, 21);
    for coding in [Coding::Group3OneD, Coding::Group3TwoD] {
        let options = EncodeOptions::new(200, coding)
            .with_g3_options(G3Options::FILL_BITS)
            .with_k(3);
        let coded = encode(&page, options).unwrap();
        let (decoded, report) = decode(&coded, options.decode_options(), 12).unwrap();
        assert_eq!(decoded, page, "{coding:?}");
        assert_eq!(report.stopped, None);
    }
}

#[test]
fn test_height_beyond_data_stops_at_end_marker() {
    let page = scanned_page(32, 4, 1);
    for (coding, reason) in [
        (Coding::Group4, StopReason::EndOfBlock),
        (Coding::Group3OneD, StopReason::ReturnToControl),
        (Coding::Group3TwoD, StopReason::ReturnToControl),
    ] {
        let options = EncodeOptions::new(32, coding);
        let coded = encode(&page, options).unwrap();
        let (decoded, report) = decode(&coded, options.decode_options(), 10).unwrap();
        assert_eq!(&decoded[..16], &page[..]);
        assert!(decoded[16..].iter().all(|&b| b == 0));
        assert_eq!(report.rows_decoded, 4);
        assert_eq!(report.stopped, Some(reason), "{coding:?}");
    }
}

#[test]
fn test_group4_strips_share_reference() {
    let page = scanned_page(48, 12, 17);
    let options = EncodeOptions::new(48, Coding::Group4);
    let half = 6 * 6;

    let mut encoder = FaxEncoder::new(options).unwrap();
    encoder.encode_rows(&page[..half]).unwrap();
    let first = encoder.take_strip();
    encoder.encode_rows(&page[half..]).unwrap();
    let second = encoder.finish();

    let mut decoder = FaxDecoder::new(options.decode_options()).unwrap();
    let (top, _) = decoder.decode(&first, 6).unwrap();
    let (bottom, _) = decoder.decode(&second, 6).unwrap();
    assert_eq!(top, &page[..half]);
    assert_eq!(bottom, &page[half..]);

    // Without the carried reference the second strip decodes differently.
    let mut fresh = FaxDecoder::new(options.decode_options()).unwrap();
    if let Ok((rows, _)) = fresh.decode(&second, 6) {
        assert_ne!(rows, &page[half..]);
    }
}
