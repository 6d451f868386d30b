use serde::{Deserialize, Serialize};

use cradle_core::{CartLineId, DomainError, DomainResult, ProductId, UserId};

/// One (product, quantity) pairing within a cart.
///
/// Invariant: `quantity >= 1`. A line driven to zero is removed, never kept.
/// At most one line exists per (owner, product) pair; [`Cart::handle`]
/// maintains both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Command: one requested cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    /// Add `quantity` of a product. Merges into an existing line for the
    /// same product instead of creating a duplicate.
    AddItem { product_id: ProductId, quantity: u32 },
    /// Delete a line. Absent lines are a benign no-op, not an error.
    RemoveLine { line_id: CartLineId },
    /// Overwrite a line's quantity. Zero behaves exactly like `RemoveLine`;
    /// an unknown line is `NotFound`.
    SetQuantity { line_id: CartLineId, quantity: u32 },
    /// Remove every line for the owner.
    Clear,
}

/// Change: the decided effect of a command.
///
/// Each variant maps onto exactly one verb of the row store: insert line,
/// update line quantity, delete line, delete all lines for the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartChange {
    LineInserted(CartLine),
    QuantitySet { line_id: CartLineId, quantity: u32 },
    LineRemoved { line_id: CartLineId },
    Cleared,
}

/// The cart aggregate: an order-irrelevant set of lines for one owner.
///
/// Holds no prices. Totals are derived on every read from current lines and
/// current product prices (see [`totals`]), so a displayed total can never
/// drift from live pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    owner: UserId,
    lines: Vec<CartLine>,
}

impl Cart {
    /// A cart is created empty on first access per owning identity.
    pub fn empty(owner: UserId) -> Self {
        Self {
            owner,
            lines: Vec::new(),
        }
    }

    /// Rehydrate from stored lines.
    pub fn from_lines(owner: UserId, lines: Vec<CartLine>) -> Self {
        Self { owner, lines }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find_line(&self, line_id: CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_for_product(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Sum of quantities across lines.
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Decide which changes a command produces. Pure: no IO, no mutation.
    pub fn handle(&self, command: &CartCommand) -> DomainResult<Vec<CartChange>> {
        match command {
            CartCommand::AddItem {
                product_id,
                quantity,
            } => self.handle_add_item(*product_id, *quantity),
            CartCommand::RemoveLine { line_id } => Ok(self.handle_remove_line(*line_id)),
            CartCommand::SetQuantity { line_id, quantity } => {
                self.handle_set_quantity(*line_id, *quantity)
            }
            CartCommand::Clear => Ok(vec![CartChange::Cleared]),
        }
    }

    /// Evolve in-memory state from a single change.
    pub fn apply(&mut self, change: &CartChange) {
        match change {
            CartChange::LineInserted(line) => {
                self.lines.push(*line);
            }
            CartChange::QuantitySet { line_id, quantity } => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.id == *line_id) {
                    line.quantity = *quantity;
                }
            }
            CartChange::LineRemoved { line_id } => {
                self.lines.retain(|l| l.id != *line_id);
            }
            CartChange::Cleared => {
                self.lines.clear();
            }
        }
    }

    fn handle_add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<Vec<CartChange>> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        // Merge into the existing line for this product, if any.
        match self.line_for_product(product_id) {
            Some(existing) => {
                let merged = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    DomainError::invariant("cart line quantity overflow")
                })?;
                Ok(vec![CartChange::QuantitySet {
                    line_id: existing.id,
                    quantity: merged,
                }])
            }
            None => Ok(vec![CartChange::LineInserted(CartLine {
                id: CartLineId::new(),
                product_id,
                quantity,
            })]),
        }
    }

    fn handle_remove_line(&self, line_id: CartLineId) -> Vec<CartChange> {
        match self.find_line(line_id) {
            Some(_) => vec![CartChange::LineRemoved { line_id }],
            None => Vec::new(),
        }
    }

    fn handle_set_quantity(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> DomainResult<Vec<CartChange>> {
        if self.find_line(line_id).is_none() {
            return Err(DomainError::not_found());
        }

        if quantity == 0 {
            return Ok(vec![CartChange::LineRemoved { line_id }]);
        }

        Ok(vec![CartChange::QuantitySet { line_id, quantity }])
    }
}

/// Fold (quantity, unit price) pairs into `(total_cents, count)`.
///
/// Callers feed this the *current* product prices joined at read time, so
/// the total tracks live pricing even when the cart itself did not change.
/// Pathological quantity-times-price products saturate rather than wrap.
pub fn totals(pairs: impl IntoIterator<Item = (u32, u64)>) -> (u64, u32) {
    pairs.into_iter().fold((0u64, 0u32), |(total, count), (quantity, price_cents)| {
        (
            total.saturating_add(u64::from(quantity).saturating_mul(price_cents)),
            count.saturating_add(quantity),
        )
    })
}
