#![no_main]

use libfuzzer_sys::fuzz_target;

use ssmul::{mult_karatsuba, mult_simple};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (head, rest) = data.split_at(1);
    let words: Vec<u32> = rest
        .chunks(4)
        .map(|c| {
            let mut buf = [0u8; 4];
            buf[..c.len()].copy_from_slice(c);
            u32::from_le_bytes(buf)
        })
        .collect();
    if words.len() < 2 {
        return;
    }
    let split = 1 + usize::from(head[0]) % (words.len() - 1);
    let (a, b) = words.split_at(split);
    assert_eq!(mult_karatsuba(a, b), mult_simple(a, b));
});
