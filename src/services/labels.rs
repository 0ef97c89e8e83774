use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, DbPool, DbResult, LabelFilter, LabelQuery, ManufacturerSet},
    models::{ActivityStatus, CreateLabel, IssueLabel, Label, Visibility},
};

/// Label issuing and distinct-value lookups.
#[derive(Clone)]
pub struct LabelService {
    db: Arc<DbPool>,
}

impl LabelService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Issue a label on behalf of a manufacturer admin.
    ///
    /// The product must be visible, belong to the given brand and to the
    /// manufacturer's company. When the product lists variants, the label's
    /// variant must be one of them.
    pub async fn issue(
        &self,
        manufacturer_id: Uuid,
        user_id: Uuid,
        input: IssueLabel,
    ) -> DbResult<Label> {
        let manufacturer = self
            .db
            .manufacturers()
            .get_by_id(manufacturer_id)
            .await?
            .filter(|m| m.status == ActivityStatus::Active)
            .ok_or_else(|| DbError::Validation("Manufacturer is not active".into()))?;

        let product = self
            .db
            .products()
            .get_by_id(input.product_id)
            .await?
            .filter(|p| p.status == Visibility::Show)
            .ok_or_else(|| {
                DbError::Validation(format!("Product '{}' not found", input.product_id))
            })?;

        if product.brand_id != input.brand_id {
            return Err(DbError::Validation(format!(
                "Product '{}' does not belong to brand '{}'",
                product.id, input.brand_id
            )));
        }
        if product.company_id != manufacturer.company_id {
            return Err(DbError::Validation(
                "Product belongs to another company".into(),
            ));
        }
        if !product.variants.is_empty() && !product.variants.contains(&input.variant) {
            return Err(DbError::Validation(format!(
                "Unknown variant '{}' for product '{}'",
                input.variant, product.name
            )));
        }

        let label = self
            .db
            .labels()
            .create(CreateLabel {
                brand_id: input.brand_id,
                product_id: input.product_id,
                manufacturer_id,
                user_id,
                variant: input.variant,
                batch_number: input.batch_number,
                created_at: None,
            })
            .await?;

        tracing::info!(
            label_id = %label.id,
            manufacturer_id = %manufacturer_id,
            batch_number = %label.batch_number,
            "Label issued"
        );
        Ok(label)
    }

    /// Flip a label between show and hide.
    ///
    /// Labels outside `visible` are reported as not found.
    pub async fn toggle_status(&self, id: Uuid, visible: &ManufacturerSet) -> DbResult<Label> {
        let label = self
            .db
            .labels()
            .get_by_id(id)
            .await?
            .filter(|label| visible.contains(label.manufacturer_id))
            .ok_or(DbError::NotFound)?;

        let updated = self
            .db
            .labels()
            .set_status(id, label.status.toggled())
            .await?;
        tracing::info!(label_id = %id, status = updated.status.as_str(), "Label status changed");
        Ok(updated)
    }

    pub async fn variants(
        &self,
        manufacturers: ManufacturerSet,
        filter: LabelFilter,
    ) -> DbResult<Vec<String>> {
        self.db
            .labels()
            .distinct_variants(&LabelQuery::new(manufacturers, filter))
            .await
    }

    pub async fn batch_numbers(
        &self,
        manufacturers: ManufacturerSet,
        filter: LabelFilter,
    ) -> DbResult<Vec<String>> {
        self.db
            .labels()
            .distinct_batch_numbers(&LabelQuery::new(manufacturers, filter))
            .await
    }
}
