//! Sort Translator - rewrites facade sort criteria for the backing store

use entity_bridge_domain::{FieldCorrespondence, PageRequest, Sort};

/// Replaces facade property names in sorts and page requests with their
/// backing names. Names without an entry pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortTranslator {
    fields: FieldCorrespondence,
}

impl SortTranslator {
    pub fn new(fields: FieldCorrespondence) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FieldCorrespondence {
        &self.fields
    }

    pub fn translate_sort(&self, sort: &Sort) -> Sort {
        if sort.is_unsorted() || self.fields.is_empty() {
            return sort.clone();
        }
        Sort::by(
            sort.iter()
                .map(|order| order.with_property(self.fields.translate(order.property()))),
        )
    }

    /// Same page number and size, sort translated
    pub fn translate_page_request(&self, request: &PageRequest) -> PageRequest {
        if request.sort().is_unsorted() {
            return request.clone();
        }
        request.with_sort(self.translate_sort(request.sort()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_bridge_domain::{Direction, Order};

    fn translator() -> SortTranslator {
        SortTranslator::new(
            [
                ("total".to_string(), "amount".to_string()),
                ("placedAt".to_string(), "created".to_string()),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn replaces_mapped_properties_and_keeps_the_rest() {
        let sort = Sort::by([Order::desc("total").ignore_case(), Order::asc("id")]);
        let translated = translator().translate_sort(&sort);

        let orders = translated.orders();
        assert_eq!(orders[0].property(), "amount");
        assert_eq!(orders[0].direction(), Direction::Desc);
        assert!(orders[0].is_ignore_case());
        assert_eq!(orders[1].property(), "id");
    }

    #[test]
    fn unsorted_passes_through() {
        assert!(translator().translate_sort(&Sort::unsorted()).is_unsorted());
    }

    #[test]
    fn empty_correspondence_is_identity() {
        let sort = Sort::by_properties(["total"]);
        assert_eq!(SortTranslator::default().translate_sort(&sort), sort);
    }

    #[test]
    fn translation_is_idempotent_on_backing_names() {
        let translator = translator();
        let once = translator.translate_sort(&Sort::by_properties(["total", "placedAt", "id"]));
        assert_eq!(translator.translate_sort(&once), once);
    }

    #[test]
    fn inverse_correspondence_restores_facade_names() {
        let translator = translator();
        let inverse = SortTranslator::new(translator.fields().inverse().into_iter().collect());
        let sort = Sort::by([Order::asc("total"), Order::desc("placedAt")]);

        assert_eq!(inverse.translate_sort(&translator.translate_sort(&sort)), sort);
    }

    #[test]
    fn page_requests_keep_number_and_size() {
        let request = PageRequest::sorted(3, 25, Sort::by_properties(["total"])).unwrap();
        let translated = translator().translate_page_request(&request);

        assert_eq!(translated.page_number(), 3);
        assert_eq!(translated.page_size(), 25);
        assert_eq!(translated.sort(), &Sort::by_properties(["amount"]));
    }
}
