use rma_model::SemanticField;

/// Built-in header substrings for each field, highest priority first.
///
/// Spellings from the Vietnamese intake sheet come first; English fallbacks
/// cover translated exports. Candidates are folded before comparison, so
/// accents and case here are cosmetic.
pub fn default_candidates(field: SemanticField) -> &'static [&'static str] {
    match field {
        SemanticField::Customer => &["khách hàng", "customer"],
        SemanticField::Product => &["sản phẩm", "product"],
        SemanticField::ProductGroup => &["nhóm hàng", "nhóm sản phẩm", "nhóm", "product group"],
        SemanticField::Repaired => &["đã sửa xong", "repaired"],
        SemanticField::Unrepairable => &["không sửa được", "unrepairable", "not repaired"],
        SemanticField::WarrantyRejected => &["từ chối bảo hành", "warranty rejected", "rejected"],
        SemanticField::IntakeDate => &["ngày tiếp nhận", "intake date", "received date"],
        SemanticField::ReturnDate => &["ngày trả khách", "return date", "returned date"],
        SemanticField::Technician => &["kỹ thuật viên", "ktv", "technician"],
        SemanticField::Serial => &["serial"],
        SemanticField::ErrorName => &["tên lỗi", "error name", "error"],
        SemanticField::ServiceType => &["loại dịch vụ", "service type"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_candidates() {
        for field in SemanticField::ALL {
            assert!(!default_candidates(field).is_empty(), "{field}");
        }
    }
}
