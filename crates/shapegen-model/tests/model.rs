//! Integration tests for shapegen-model.

use shapegen_model::{
    DefaultSymbolProvider, MemberDef, Model, NumberType, RustType, Shape, ShapeId, ShapeType,
    SymbolProvider, Trait,
};

fn id(name: &str) -> ShapeId {
    ShapeId::new("com.example", name)
}

fn catalog() -> Model {
    let mut model = Model::new();
    model.add(Shape::new(id("Sku"), ShapeType::String));
    model.add(Shape::new(id("Price"), ShapeType::Number(NumberType::Double)));
    model.add(Shape::new(id("Secret"), ShapeType::String).with_trait(Trait::Sensitive));
    model.add_list(id("Skus"), id("Sku"), vec![]);
    model.add_map(id("Prices"), id("Sku"), id("Price"), vec![]);
    model.add_structure(
        id("Catalog"),
        vec![],
        vec![
            MemberDef::new("skus", id("Skus")).with_trait(Trait::Required),
            MemberDef::new("prices", id("Prices")),
        ],
    );
    model
}

#[test]
fn shape_serializes_with_textual_id() {
    let shape = Shape::new(id("Secret"), ShapeType::String).with_trait(Trait::Sensitive);

    insta::assert_json_snapshot!(shape, @r###"
    {
      "id": "com.example#Secret",
      "shape_type": "String",
      "traits": [
        "Sensitive"
      ]
    }
    "###);
}

#[test]
fn model_roundtrips_through_json() {
    let model = catalog();
    let json = serde_json::to_string(&model).unwrap();
    let back: Model = serde_json::from_str(&json).unwrap();
    assert_eq!(back, model);
}

#[test]
fn collections_resolve_to_std_types() {
    let model = catalog();
    let provider = DefaultSymbolProvider::new(&model);

    let skus = provider
        .to_symbol(model.expect_shape(&id("Catalog").with_member("skus")).unwrap())
        .unwrap();
    assert_eq!(skus.rust_type, RustType::Vec(Box::new(RustType::String)));

    let prices = provider
        .to_symbol(model.expect_shape(&id("Catalog").with_member("prices")).unwrap())
        .unwrap();
    assert_eq!(
        prices.rust_type.to_string(),
        "::std::option::Option<::std::collections::HashMap<::std::string::String, f64>>"
    );
    assert_eq!(prices.name, "prices");
}

#[test]
fn model_iterates_in_id_order() {
    let model = catalog();
    let ids: Vec<String> = model.shapes().map(|s| s.id().to_string()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(model.len(), 11);
}
