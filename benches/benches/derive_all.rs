//! Whole-model metadata derivation.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shapegen_meta::{MetaConfig, MetadataEngine, Mode};
use shapegen_model::{DefaultSymbolProvider, MemberDef, Model, Shape, ShapeId, ShapeType, Trait};
use std::hint::black_box;

/// `n` structures with a handful of members each, some sensitive.
fn synthetic_model(n: usize) -> Model {
    let mut model = Model::new();
    let text = ShapeId::new("bench", "Text");
    let secret = ShapeId::new("bench", "Secret");
    model.add(Shape::new(text.clone(), ShapeType::String));
    model.add(Shape::new(secret.clone(), ShapeType::String).with_trait(Trait::Sensitive));
    for i in 0..n {
        let list = ShapeId::new("bench", format!("List{}", i));
        model.add_list(list.clone(), text.clone(), vec![]);
        let mut members = vec![
            MemberDef::new("a", text.clone()),
            MemberDef::new("b", text.clone()),
            MemberDef::new("items", list),
        ];
        if i % 4 == 0 {
            members.push(MemberDef::new("secret", secret.clone()));
        }
        model.add_structure(ShapeId::new("bench", format!("Struct{}", i)), vec![], members);
    }
    model
}

fn bench_derive_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_all");
    for n in [100, 1000] {
        let model = synthetic_model(n);
        let symbols = DefaultSymbolProvider::new(&model);
        for mode in [Mode::Client, Mode::Server] {
            let config = MetaConfig {
                mode,
                ..Default::default()
            };
            let engine = MetadataEngine::from_config(&symbols, &config);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), n),
                &engine,
                |b, engine| b.iter(|| black_box(engine.derive_all().unwrap())),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_derive_all);
criterion_main!(benches);
