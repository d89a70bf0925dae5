#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::{BigInt, Sign};

use ssmul::{multiply, multiply_with, Thresholds};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (head, rest) = data.split_at(2);
    let split = usize::from(head[0]) * rest.len() / 256;
    let (a_bytes, b_bytes) = rest.split_at(split);
    let a_sign = if head[1] & 1 == 0 { Sign::Plus } else { Sign::Minus };
    let b_sign = if head[1] & 2 == 0 { Sign::Plus } else { Sign::Minus };
    let a = BigInt::from_bytes_le(a_sign, a_bytes);
    let b = BigInt::from_bytes_le(b_sign, b_bytes);

    let expected = &a * &b;
    assert_eq!(multiply(&a, &b), expected, "default thresholds");

    // Lowered thresholds force the transform path onto small inputs.
    let cfg = Thresholds::new(512, 4096).unwrap();
    assert_eq!(multiply_with(&cfg, &a, &b), expected, "lowered thresholds");
});
