//! Evaluation throughput on random automata, comparing a plain alphabet (one group per symbol)
//! with a grouped alphabet of the same size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dfa_sim::prelude::*;
use dfa_sim::random::{generate_random_automaton, random_word};

fn plain_alphabet() -> AlphabetIndex {
    AlphabetIndex::plain(('a'..='z').chain('0'..='9'))
}

fn grouped_alphabet() -> AlphabetIndex {
    AlphabetIndex::build(
        &AlphabetSpec::new()
            .with_group("vowel", "a,e,i,o,u")
            .with_group("digit", "0,1,2,3,4,5,6,7,8,9")
            .with_group("consonant", "b,c,d,f,g,h,j,k,l,m,n,p,q,r,s,t,v,w,x,y,z"),
    )
    .unwrap()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut group = c.benchmark_group("evaluate");

    for (name, alphabet) in [("plain", plain_alphabet()), ("grouped", grouped_alphabet())] {
        let dfa = generate_random_automaton(&mut rng, 64, alphabet, 1.0).unwrap();
        for len in [16, 256, 4096] {
            let word = random_word(&mut rng, dfa.alphabet(), len);
            group.throughput(Throughput::Elements(len as u64));
            group.bench_with_input(BenchmarkId::new(name, len), &word, |b, word| {
                b.iter(|| dfa.evaluate(black_box(word)).unwrap().accepted())
            });
        }
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let json = r#"{
        "states": ["start", "int", "frac"],
        "alphabet": { "groups": { "digit": "0,1,2,3,4,5,6,7,8,9" }, "isolated": ["."] },
        "initialState": "start",
        "acceptingStates": ["int", "frac"],
        "transitions": {
            "start": { "digit": "int" },
            "int": { "digit": "int", ".": "frac" },
            "frac": { "digit": "frac" }
        }
    }"#;

    c.bench_function("definition/build", |b| {
        b.iter(|| {
            Definition::from_json(black_box(json))
                .unwrap()
                .build()
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_build);
criterion_main!(benches);
