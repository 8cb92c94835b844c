use super::{
    category_label, field, format_price, format_schedule, region_label, render_list, truncate,
    Item, DESCRIPTION_BUDGET, ITINERARY_BUDGET, NOT_AVAILABLE,
};
use crate::models::Tour;

pub fn format_tour_list(tours: &[Tour]) -> String {
    if tours.is_empty() {
        return "Không tìm thấy tour nào.".to_string();
    }

    let items: Vec<Item> = tours.iter().map(tour_summary).collect();
    render_list(
        &format!("Các tour sắp khởi hành ({} tour):", tours.len()),
        &items,
    )
}

/// Search results for one destination, with description and itinerary.
pub fn format_tour_search(destination: &str, tours: &[Tour]) -> String {
    if tours.is_empty() {
        return format!("Không tìm thấy tour nào đến {destination}.");
    }

    let items: Vec<Item> = tours
        .iter()
        .map(|tour| {
            tour_summary(tour)
                .row([
                    tour.region
                        .as_deref()
                        .and_then(|r| field("Khu vực", region_label(r).to_string())),
                    tour.category
                        .as_deref()
                        .and_then(|c| field("Loại hình", category_label(c).to_string())),
                ])
                .row([tour
                    .description
                    .as_deref()
                    .and_then(|d| field("Mô tả", truncate(d, DESCRIPTION_BUDGET).into_owned()))])
                .row([tour
                    .itinerary
                    .as_deref()
                    .and_then(|i| field("Lịch trình", truncate(i, ITINERARY_BUDGET).into_owned()))])
        })
        .collect();

    render_list(
        &format!("Tìm thấy {} tour đến {destination}:", tours.len()),
        &items,
    )
}

/// Title/destination, then prices and duration, then schedule, then seats
/// and rating.
fn tour_summary(tour: &Tour) -> Item {
    let heading = match tour.destination.as_deref() {
        Some(dest) => format!("{} ({dest})", tour.title),
        None => tour.title.clone(),
    };

    let seats = match tour.availability {
        Some(open) => format!("còn {open}/{} chỗ", tour.capacity),
        None => format!("{} chỗ", tour.capacity),
    };

    let rating = tour.avg_rating.filter(|_| tour.review_count > 0).map(|avg| {
        format!("{avg:.1}/5 ({} đánh giá)", tour.review_count)
    });

    Item::new("•", heading)
        .row([
            field("Giá người lớn", format_price(tour.price_adult)),
            field("Giá trẻ em", format_price(tour.price_child)),
            field(
                "Thời gian",
                tour.duration
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
        ])
        .row([field(
            "Khởi hành",
            format_schedule(tour.start_date, tour.end_date),
        )])
        .row([field("Chỗ", seats), field("Đánh giá", rating)])
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::services::formatters::CONTACT_PLACEHOLDER;

    fn tour() -> Tour {
        Tour {
            id: 1,
            title: "Khám phá Đà Nẵng - Hội An".to_string(),
            description: Some("Tắm biển Mỹ Khê.".to_string()),
            itinerary: None,
            destination: Some("Đà Nẵng".to_string()),
            region: Some("CENTRAL".to_string()),
            category: Some("BEACH".to_string()),
            duration: Some("4 ngày 3 đêm".to_string()),
            price_adult: Some(5_500_000.0),
            price_child: Some(3_900_000.0),
            capacity: 30,
            availability: Some(12),
            start_date: NaiveDate::from_ymd_opt(2027, 3, 10),
            end_date: NaiveDate::from_ymd_opt(2027, 3, 13),
            avg_rating: Some(4.5),
            review_count: 2,
        }
    }

    #[test]
    fn test_tour_list_layout() {
        let out = format_tour_list(&[tour()]);
        assert_eq!(
            out,
            "Các tour sắp khởi hành (1 tour):\n\
             • Khám phá Đà Nẵng - Hội An (Đà Nẵng)\n   \
             Giá người lớn: 5.500.000₫ | Giá trẻ em: 3.900.000₫ | Thời gian: 4 ngày 3 đêm\n   \
             Khởi hành: 10/03/2027 - 13/03/2027\n   \
             Chỗ: còn 12/30 chỗ | Đánh giá: 4.5/5 (2 đánh giá)"
        );
    }

    #[test]
    fn test_tour_list_omits_free_text() {
        let out = format_tour_list(&[tour()]);
        assert!(!out.contains("Mô tả"));
    }

    #[test]
    fn test_missing_price_renders_contact() {
        let mut t = tour();
        t.price_adult = None;
        t.price_child = None;
        let out = format_tour_list(&[t]);
        assert!(out.contains(&format!("Giá người lớn: {CONTACT_PLACEHOLDER}")));
        assert!(!out.contains("0₫ |"));
    }

    #[test]
    fn test_zero_price_renders_contact() {
        let mut t = tour();
        t.price_adult = Some(0.0);
        let out = format_tour_list(&[t]);
        assert!(out.contains("Giá người lớn: Liên hệ | Giá trẻ em: 3.900.000₫"));
    }

    #[test]
    fn test_unrated_tour_has_no_rating_field() {
        let mut t = tour();
        t.avg_rating = None;
        t.review_count = 0;
        assert!(!format_tour_list(&[t]).contains("Đánh giá"));
    }

    #[test]
    fn test_search_includes_labels_and_truncated_description() {
        let mut t = tour();
        t.description = Some("x".repeat(600));
        t.category = Some("TREKKING".to_string());
        let out = format_tour_search("đà nẵng", &[t]);

        assert!(out.starts_with("Tìm thấy 1 tour đến đà nẵng:"));
        assert!(out.contains("Khu vực: Miền Trung | Loại hình: TREKKING"));
        assert!(out.contains(&format!("Mô tả: {}...", "x".repeat(500))));
        assert!(!out.contains(&"x".repeat(501)));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(format_tour_list(&[]), "Không tìm thấy tour nào.");
        assert_eq!(
            format_tour_search("huế", &[]),
            "Không tìm thấy tour nào đến huế."
        );
    }

    #[test]
    fn test_output_is_deterministic() {
        let tours = vec![tour(), tour()];
        assert_eq!(format_tour_search("đà nẵng", &tours), format_tour_search("đà nẵng", &tours));
    }
}
