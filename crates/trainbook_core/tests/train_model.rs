use trainbook_core::{Train, TrainValidationError};

fn express_train() -> Train {
    Train::new("Express Train", "City A", "City B", 100.0, 10.0, 200)
}

#[test]
fn new_train_has_no_id() {
    let train = express_train();

    assert_eq!(train.id, None);
    assert_eq!(train.name, "Express Train");
    assert_eq!(train.total_seats, 200);
    assert_eq!(train.with_id(7).id, Some(7));
}

#[test]
fn overwrite_from_keeps_identity_and_copies_every_other_field() {
    let mut existing = express_train().with_id(1);
    let replacement = Train::new("Updated Train", "City C", "City D", 150.0, 15.0, 250).with_id(99);

    existing.overwrite_from(&replacement);

    assert_eq!(existing.id, Some(1));
    assert_eq!(existing, Train { id: Some(1), ..replacement });
}

#[test]
fn validate_accepts_boundary_values() {
    let free = Train::new("Free", "A", "B", 0.0, 100.0, 0);
    assert_eq!(free.validate(), Ok(()));
    assert_eq!(express_train().validate(), Ok(()));
}

#[test]
fn validate_rejects_blank_text_fields() {
    let mut train = express_train();
    train.source = "   ".to_string();

    assert_eq!(
        train.validate(),
        Err(TrainValidationError::BlankField("source"))
    );
}

#[test]
fn validate_rejects_negative_or_non_finite_price() {
    let mut train = express_train();
    train.base_price = -0.5;
    assert_eq!(
        train.validate(),
        Err(TrainValidationError::InvalidBasePrice(-0.5))
    );

    train.base_price = f64::INFINITY;
    assert!(matches!(
        train.validate(),
        Err(TrainValidationError::InvalidBasePrice(_))
    ));
}

#[test]
fn validate_rejects_discount_outside_percentage_range() {
    let mut train = express_train();
    train.discount_percentage = 100.5;
    let err = train.validate().unwrap_err();

    assert_eq!(err, TrainValidationError::InvalidDiscountPercentage(100.5));
    assert!(err.to_string().contains("0..=100"));

    train.discount_percentage = f64::NAN;
    assert!(matches!(
        train.validate(),
        Err(TrainValidationError::InvalidDiscountPercentage(_))
    ));
}

#[test]
fn train_serialization_uses_camel_case_wire_fields() {
    let train = express_train().with_id(1);

    let json = serde_json::to_value(&train).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Express Train");
    assert_eq!(json["source"], "City A");
    assert_eq!(json["destination"], "City B");
    assert_eq!(json["basePrice"], 100.0);
    assert_eq!(json["discountPercentage"], 10.0);
    assert_eq!(json["totalSeats"], 200);

    let decoded: Train = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, train);
}

#[test]
fn deserialize_rejects_negative_seat_count() {
    let value = serde_json::json!({
        "id": null,
        "name": "Bad",
        "source": "A",
        "destination": "B",
        "basePrice": 1.0,
        "discountPercentage": 0.0,
        "totalSeats": -5
    });

    assert!(serde_json::from_value::<Train>(value).is_err());
}
