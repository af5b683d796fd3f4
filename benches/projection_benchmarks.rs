use catalog_aggregator::app::endpoints::encode_component;
use catalog_aggregator::domain::{Game, Item, Page, Pass};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

fn catalog_page(records: usize) -> Value {
    let data: Vec<Value> = (0..records)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Asset {i}"),
                "price": i % 250,
                "creator": {"name": "builder"}
            })
        })
        .collect();
    json!({"data": data, "nextPageCursor": "abc"})
}

fn bench_item_projection(c: &mut Criterion) {
    let body = catalog_page(100);

    c.bench_function("parse_and_project_100_items", |b| {
        b.iter(|| {
            if let Page::Valid { records, .. } = Page::parse_data(black_box(body.clone())) {
                let items: Vec<Item> = records.iter().map(Item::from_record).collect();
                black_box(items);
            }
        })
    });
}

fn bench_pass_projection(c: &mut Criterion) {
    let game = Game::from_record(&json!({"name": "Obby", "universeId": 100}));
    let passes: Vec<Value> = (0..100)
        .map(|i| json!({"id": i, "name": format!("Pass {i}"), "priceInRobux": i}))
        .collect();
    let body = json!({"data": {"gamePasses": passes}});

    c.bench_function("parse_and_project_100_passes", |b| {
        b.iter(|| {
            if let Page::Valid { records, .. } = Page::parse_game_passes(black_box(body.clone())) {
                let passes: Vec<Pass> = records.iter().map(|r| Pass::from_record(r, &game)).collect();
                black_box(passes);
            }
        })
    });
}

fn bench_encoding(c: &mut Criterion) {
    let cursor = "eyJzdGFydEluZGV4IjoxMDAsImRpc2NyaW1pbmF0b3IiOiJ1c2VySWQ6NDIifQ==";

    c.bench_function("encode_cursor_component", |b| {
        b.iter(|| encode_component(black_box(cursor)))
    });
}

criterion_group!(benches, bench_item_projection, bench_pass_projection, bench_encoding);
criterion_main!(benches);
