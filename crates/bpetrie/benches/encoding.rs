#![allow(missing_docs)]

use std::sync::LazyLock;

use bpetrie::{BytePairEncoder, BytePairTrainerOptions, TokenDecoder, TokenEncoder};
use divan::{Bencher, black_box, counter::BytesCount};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn english_text() -> String {
    let paragraph = "The quick brown fox jumps over the lazy dog. \
        It's a beautiful day, and I'll be taking my 3 dogs for a walk. \
        Don't forget: the temperature is 72 degrees! \
        We've been waiting since 10:30am.\n\
        \n\
        In 2024, artificial intelligence continued to advance rapidly. \
        Large language models demonstrated remarkable capabilities. \
        The researchers couldn't believe the results they'd achieved.\n";
    paragraph.repeat(100)
}

static ENCODER: LazyLock<BytePairEncoder<u32>> = LazyLock::new(|| {
    let mut encoder = BytePairEncoder::new(BytePairTrainerOptions::with_target_vocab_size(1000));
    encoder.fit([english_text()]).unwrap();
    encoder
});

mod training {
    use super::*;

    #[divan::bench(args = [100, 500, 1000])]
    fn fit(
        bencher: Bencher,
        target: usize,
    ) {
        let text = english_text();
        bencher.counter(BytesCount::new(text.len())).bench(|| {
            let mut encoder: BytePairEncoder<u32> =
                BytePairEncoder::new(BytePairTrainerOptions::with_target_vocab_size(target));
            encoder.fit([black_box(text.as_str())]).unwrap();
            encoder
        });
    }
}

mod english {
    use super::*;

    #[divan::bench]
    fn encode(bencher: Bencher) {
        let text = english_text();
        let encoder = ENCODER.encoder().unwrap();
        bencher
            .counter(BytesCount::new(text.len()))
            .bench(|| encoder.try_encode(black_box(&text)).unwrap());
    }

    #[divan::bench]
    fn decode(bencher: Bencher) {
        let text = english_text();
        let tokens = ENCODER.transform(&text).unwrap();
        let decoder = ENCODER.decoder().unwrap();
        bencher
            .counter(BytesCount::new(text.len()))
            .bench(|| decoder.try_decode_to_string(black_box(&tokens)).unwrap());
    }

    #[divan::bench]
    fn encode_batch(bencher: Bencher) {
        let text = english_text();
        let batch: Vec<&str> = text.lines().collect();
        let encoder = ENCODER.encoder().unwrap();
        bencher
            .counter(BytesCount::new(text.len()))
            .bench(|| encoder.try_encode_batch(black_box(&batch)).unwrap());
    }
}
