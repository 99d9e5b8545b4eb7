use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrule_translate::InitializationNormalizer;
use ferrule_tree::*;

/// A class with `fields` initialized fields, an initializer block per ten
/// fields, one delegating and one designated constructor.
fn wide_class(fields: usize) -> ClassDecl {
    let owner = TypeRef::new(1, "Test");
    let mut class = ClassDecl::class(owner.clone());
    for i in 0..fields {
        let name = format!("f{}", i);
        class.push_member(
            FieldDecl::new(name.clone(), "int").with_initializer(Expression::int(i as i64)),
        );
        if i % 10 == 9 {
            class.push_member(InitializerBlock::instance(vec![Statement::expr(Expression::assign(
                Expression::field(FieldRef::instance(&owner, name)),
                Expression::concat(Expression::string("x"), Expression::string("\u{ffff}")),
            ))]));
        }
    }
    class.push_member(
        ConstructorDecl::new("init")
            .with_body(vec![Statement::this_call("initWithInt:", vec![Expression::int(0)])]),
    );
    class.push_member(ConstructorDecl::new("initWithInt:").with_param(Param::new("i", "int")));
    class
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = InitializationNormalizer::default();
    let mut group = c.benchmark_group("normalize");

    for fields in [10, 100, 1000] {
        let class = wide_class(fields);
        group.bench_with_input(BenchmarkId::new("fields", fields), &class, |b, class| {
            b.iter(|| {
                let mut class = class.clone();
                normalizer.normalize(black_box(&mut class)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_renormalize(c: &mut Criterion) {
    let normalizer = InitializationNormalizer::default();
    let mut class = wide_class(100);
    normalizer.normalize(&mut class).unwrap();

    c.bench_function("renormalize_noop", |b| {
        b.iter(|| {
            let mut class = class.clone();
            normalizer.normalize(black_box(&mut class)).unwrap()
        });
    });
}

criterion_group!(benches, bench_normalize, bench_renormalize);
criterion_main!(benches);
