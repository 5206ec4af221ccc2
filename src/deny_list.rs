/// Labels that raise an alert. Not configurable.
pub const DANGEROUS_ANIMALS: [&str; 3] = ["lion", "tiger", "leopard"];

/// Case-insensitive exact membership; `"Lionfish"` is not `"lion"`.
pub fn is_dangerous(label: &str) -> bool {
    let label = label.to_lowercase();
    DANGEROUS_ANIMALS.iter().any(|animal| *animal == label)
}
