use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wordwheel::engine::words::{Language, WordSource};

/// Deterministic pseudo-dictionary: every consonant/vowel syllable pair,
/// three syllables per word.
fn make_words(count: usize) -> Vec<String> {
    let consonants = ['b', 'c', 'd', 'f', 'g', 'l', 'm', 'n', 'p', 'r', 's', 't'];
    let vowels = ['a', 'e', 'i', 'o', 'u'];
    (0..count)
        .map(|i| {
            let mut word = String::new();
            let mut n = i;
            for _ in 0..3 {
                word.push(consonants[n % consonants.len()]);
                n /= consonants.len();
                word.push(vowels[n % vowels.len()]);
                n /= vowels.len();
            }
            word
        })
        .collect()
}

fn bench_scan_lookup(c: &mut Criterion) {
    let words = make_words(5000);
    let refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let source = WordSource::from_words(Language::En, &refs);

    c.bench_function("lookup scan (5000 words)", |b| {
        b.iter(|| source.lookup(black_box(3), black_box('R'), black_box("BARAGA")))
    });
}

fn bench_indexed_lookup(c: &mut Criterion) {
    let words = make_words(5000);
    let refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let source = WordSource::from_words(Language::En, &refs).with_rank_index();

    c.bench_function("lookup indexed (5000 words)", |b| {
        b.iter(|| source.lookup(black_box(3), black_box('R'), black_box("BARAGA")))
    });
}

criterion_group!(benches, bench_scan_lookup, bench_indexed_lookup);
criterion_main!(benches);
