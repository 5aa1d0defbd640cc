use pandrs_aggstats::{aggregate, AggregateOptions, Collapse, Column, DataFrame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut df = DataFrame::new();
    df.add_column("region", Column::from(vec!["east", "east", "west", "west", "west"]))?;
    df.add_column("sales", Column::from(vec![120.0, 80.0, 200.0, 150.0, 175.0]))?;
    df.add_column("visits", Column::from(vec![Some(12i64), Some(9), None, Some(20), Some(18)]))?;

    println!("=== Default aggregation ===");
    let result = aggregate(&df, &AggregateOptions::new(["region"]))?;
    print_frame(&result);

    println!("\n=== Keep std and count, 90% confidence ===");
    let opts = AggregateOptions::new(["region"])
        .drop_std(false)
        .drop_count(false)
        .confidence(Some(0.90));
    print_frame(&aggregate(&df, &opts)?);

    println!("\n=== Two-level labels ===");
    let opts = AggregateOptions::new(["region"]).collapse(Collapse::NoCollapse);
    print_frame(&aggregate(&df, &opts)?);

    println!("\n=== Options from TOML ===");
    let opts = AggregateOptions::from_toml_str(
        r#"
        group_columns = ["region"]
        value_columns = ["sales"]
        confidence = false
        global_size_column_name = "n"
        "#,
    )?;
    println!("{}", df.stats_agg(&opts)?.to_json()?);

    Ok(())
}

fn print_frame(frame: &pandrs_aggstats::AggregatedFrame) {
    let labels: Vec<String> = frame.column_labels().iter().map(|l| l.to_string()).collect();
    println!("{:?} | {}", frame.index().names(), labels.join(" | "));
    for (row, key) in frame.index().keys().iter().enumerate() {
        let values: Vec<String> = frame
            .column_labels()
            .iter()
            .map(|label| {
                frame
                    .value(key, label)
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_default()
            })
            .collect();
        let key: Vec<String> = key.iter().map(|k| k.to_string()).collect();
        println!("{} {:?} | {}", row, key, values.join(" | "));
    }
}
