use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique email
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // stock_alerts: the evaluation pass scans active alerts by symbol
    {
        let col = db.collection::<mongodb::bson::Document>("stock_alerts");
        let model = IndexModel::builder()
            .keys(doc! { "is_active": 1, "symbol": 1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // portfolio_alerts: same scan shape
    {
        let col = db.collection::<mongodb::bson::Document>("portfolio_alerts");
        let model = IndexModel::builder()
            .keys(doc! { "is_active": 1, "symbol": 1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}
