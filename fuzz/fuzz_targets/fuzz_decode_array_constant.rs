#![no_main]

use formula_biff_array::{ArrayConstant, DecodeOptions};
use libfuzzer_sys::fuzz_target;

/// Cap the declared cell count so a hostile header can't make the harness allocate the BIFF8
/// maximum (16M cells) per input.
const MAX_FUZZ_CELLS: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    let Some(&selector) = data.first() else {
        return;
    };
    let data = &data[1..];

    let options = DecodeOptions::default()
        .with_max_cells(MAX_FUZZ_CELLS)
        .with_strict_padding(selector & 0b1 != 0);

    let mut cursor = formula_biff_array::ByteCursor::new(data);
    let Ok(array) = ArrayConstant::read_with_options(&mut cursor, &options) else {
        return;
    };
    assert!(cursor.position() <= data.len());
    assert_eq!(array.len(), array.column_count() * array.row_count());

    // Re-encoding must always succeed and be stable across another decode.
    let encoded = array.encode().expect("decoded arrays are always encodable");
    if options.strict_padding {
        // Strict decoding only accepts bytes the encoder would produce itself.
        assert_eq!(encoded, data[..cursor.position()]);
    }
    let (reparsed, reused) = ArrayConstant::decode(&encoded).expect("re-decode");
    assert_eq!(reused, encoded.len());
    assert_eq!(reparsed.encode().expect("re-encode"), encoded);

    let _ = array.to_string();
});
