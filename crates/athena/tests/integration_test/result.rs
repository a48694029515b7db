//! Tests for reshaping raw Athena rows into records.

use offences_athena::*;

fn offences_result(data_rows: usize) -> AthenaQueryResult {
    let columns = vec![
        AthenaColumn::new("offence_location_code", "integer"),
        AthenaColumn::new("camera_location_code", "integer"),
        AthenaColumn::new("sum_inf_count", "bigint"),
        AthenaColumn::new("camera_type_offence", "varchar"),
        AthenaColumn::new("latitude", "varchar"),
        AthenaColumn::new("longitude", "varchar"),
    ];

    let mut rows = vec![columns.iter().map(|c| Some(c.name.clone())).collect()];
    for i in 0..data_rows {
        rows.push(vec![
            Some(format!("{}", 1000 + i)),
            Some(format!("{}", 2000 + i)),
            Some(format!("{}", i * 3)),
            Some("Speed".to_string()),
            Some("-31.95".to_string()),
            Some("115.86".to_string()),
        ]);
    }

    AthenaQueryResult {
        query_id: "res-1".to_string(),
        columns,
        rows,
    }
}

#[test]
fn test_records_match_data_rows() {
    for n in [0, 1, 25] {
        let result = offences_result(n);
        assert_eq!(result.data_row_count(), n);

        let records = result.into_records();
        assert_eq!(records.len(), n);
    }
}

#[test]
fn test_record_values_are_strings() {
    let records = offences_result(2).into_records();

    let first = &records[0];
    assert_eq!(first.len(), 6);
    assert_eq!(first["offence_location_code"], "1000");
    assert_eq!(first["sum_inf_count"], "0");
    assert_eq!(first["camera_type_offence"], "Speed");

    let json = serde_json::to_value(&records[1]).unwrap();
    assert_eq!(json["camera_location_code"], "2001");
    assert!(json["sum_inf_count"].is_string());
}

#[test]
fn test_reshape_free_function() {
    let rows = vec![
        vec![Some("rego_state".to_string())],
        vec![Some("WA".to_string())],
        vec![None],
    ];
    let records = reshape(&["rego_state"], &rows);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["rego_state"], "WA");
    assert_eq!(records[1]["rego_state"], "");
}
