pub mod alert_record;
pub mod impl_csv;
#[cfg(test)]
pub mod impl_fake;
pub mod interface;
