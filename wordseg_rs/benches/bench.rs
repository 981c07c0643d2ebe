use divan::Bencher;
use wordseg_rs::{word_break, BmesHmm, BmesState, FreqDict};

use BmesState::{Begin, End, Middle, Single};

const WORD_LIST: &[(&str, u64)] = &[
    ("在", 500),
    ("的", 800),
    ("是", 700),
    ("春风", 56),
    ("吹拂", 30),
    ("季节", 40),
    ("起舞", 15),
    ("翩翩起舞", 20),
    ("雪花", 10),
    ("最终", 10),
    ("果实", 10),
    ("你好", 25),
    ("再见", 18),
    ("世界", 33),
];

const SENTENCE: &str = "在春风吹拂的季节翩翩起舞，而雪花是最终的果实";

fn build_dict() -> FreqDict {
    let mut dict = FreqDict::new();
    for &(word, freq) in WORD_LIST {
        dict.add_word(word, freq);
    }
    dict.finalize();
    dict
}

fn build_hmm() -> BmesHmm {
    let runes = |sentence: &'static str| wordseg_rs::split_runes(sentence.as_bytes()).unwrap();
    let mut model = BmesHmm::new();
    model.train(&runes("你好"), &[Begin, End]);
    model.train(
        &runes("春风吹拂的季节"),
        &[Begin, End, Begin, End, Single, Begin, End],
    );
    model.train(&runes("翩翩起舞"), &[Begin, Middle, Middle, End]);
    model.normalize();
    model
}

#[divan::bench]
fn bench_dict_build(bencher: Bencher) {
    bencher.bench(build_dict);
}

#[divan::bench]
fn bench_word_break_dict_only(bencher: Bencher) {
    let dict = build_dict();
    bencher.bench(|| {
        word_break(divan::black_box(SENTENCE), Some(&dict), None)
            .unwrap()
            .len()
    });
}

#[divan::bench]
fn bench_word_break_dict_and_hmm(bencher: Bencher) {
    let dict = build_dict();
    let hmm = build_hmm();
    bencher.bench(|| {
        word_break(divan::black_box(SENTENCE), Some(&dict), Some(&hmm))
            .unwrap()
            .len()
    });
}

fn main() {
    divan::main();
}
