use super::{
    field, format_datetime, format_guests, format_money, format_schedule, render_fields,
    render_list, short_id, truncate, Item, SPECIAL_REQUEST_BUDGET,
};
use crate::models::Booking;

fn tour_heading(booking: &Booking) -> String {
    match booking.destination.as_deref() {
        Some(dest) => format!("{} ({dest})", booking.tour_title),
        None => booking.tour_title.clone(),
    }
}

pub fn format_booking(booking: &Booking) -> String {
    let promotion = booking.promotion_code.as_deref().map(|code| {
        match booking.promotion_description.as_deref() {
            Some(desc) => format!("{code} - {desc}"),
            None => code.to_string(),
        }
    });

    render_fields([
        field("Mã booking", booking.id.clone()),
        field("Tour", tour_heading(booking)),
        field(
            "Số khách",
            format_guests(booking.num_adults, booking.num_children),
        ),
        field("Tổng tiền", format_money(booking.total_price)),
        field("Lịch trình", format_schedule(booking.start_date, booking.end_date)),
        field("Ngày đặt", format_datetime(booking.booking_date)),
        field("Trạng thái", booking.status.label().to_string()),
        field("Khuyến mãi", promotion),
        field(
            "Yêu cầu đặc biệt",
            booking
                .special_request
                .as_deref()
                .map(|r| truncate(r, SPECIAL_REQUEST_BUDGET).into_owned()),
        ),
    ])
}

pub fn format_booking_not_found(booking_id: &str) -> String {
    format!("Không tìm thấy booking với mã {booking_id}.")
}

/// Recent bookings of one customer, headed by the customer's name.
pub fn format_booking_list(bookings: &[Booking]) -> String {
    let Some(first) = bookings.first() else {
        return "Không tìm thấy đơn đặt tour nào.".to_string();
    };

    let name = first.customer_name.as_deref().unwrap_or("Khách hàng");
    let items: Vec<Item> = bookings
        .iter()
        .map(|b| {
            Item::new("📌", tour_heading(b))
                .row([
                    field("Tổng tiền", format_money(b.total_price)),
                    field("Số khách", format_guests(b.num_adults, b.num_children)),
                ])
                .row([
                    field("Lịch trình", format_schedule(b.start_date, b.end_date)),
                    field("Ngày đặt", format_datetime(b.booking_date)),
                ])
                .row([
                    field("Mã", short_id(&b.id)),
                    field("Trạng thái", b.status.label().to_string()),
                ])
        })
        .collect();

    render_list(&format!("Danh sách đặt tour của {name}:"), &items)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::BookingStatus;

    fn booking() -> Booking {
        Booking {
            id: "3f2504e0-4f89-41d3-9a0c-0305e82c3301".to_string(),
            booking_date: NaiveDate::from_ymd_opt(2026, 9, 1).and_then(|d| d.and_hms_opt(10, 0, 0)),
            num_adults: 2,
            num_children: Some(1),
            total_price: Some(13_770_000.0),
            status: BookingStatus::Confirmed,
            special_request: Some("Phòng gần biển".to_string()),
            tour_title: "Khám phá Đà Nẵng - Hội An".to_string(),
            destination: Some("Đà Nẵng".to_string()),
            start_date: NaiveDate::from_ymd_opt(2027, 3, 10),
            end_date: NaiveDate::from_ymd_opt(2027, 3, 13),
            customer_name: Some("Nguyễn Văn An".to_string()),
            promotion_code: Some("SUMMER10".to_string()),
            promotion_description: Some("Giảm 10% mùa hè".to_string()),
        }
    }

    #[test]
    fn test_single_booking_layout() {
        assert_eq!(
            format_booking(&booking()),
            "Mã booking: 3f2504e0-4f89-41d3-9a0c-0305e82c3301\n\
             Tour: Khám phá Đà Nẵng - Hội An (Đà Nẵng)\n\
             Số khách: 2 người lớn, 1 trẻ em\n\
             Tổng tiền: 13.770.000₫\n\
             Lịch trình: 10/03/2027 - 13/03/2027\n\
             Ngày đặt: 01/09/2026 10:00\n\
             Trạng thái: Đã xác nhận\n\
             Khuyến mãi: SUMMER10 - Giảm 10% mùa hè\n\
             Yêu cầu đặc biệt: Phòng gần biển"
        );
    }

    #[test]
    fn test_optional_fields_are_dropped() {
        let mut b = booking();
        b.promotion_code = None;
        b.special_request = None;
        b.num_children = None;
        b.total_price = None;
        let out = format_booking(&b);
        assert!(!out.contains("Khuyến mãi"));
        assert!(!out.contains("Yêu cầu đặc biệt"));
        assert!(out.contains("Số khách: 2 người lớn, 0 trẻ em"));
        assert!(out.contains("Tổng tiền: Liên hệ"));
    }

    #[test]
    fn test_unknown_status_renders_raw() {
        let mut b = booking();
        b.status = BookingStatus::Other("REFUND_REQUESTED".to_string());
        assert!(format_booking(&b).contains("Trạng thái: REFUND_REQUESTED"));
    }

    #[test]
    fn test_special_request_is_truncated() {
        let mut b = booking();
        b.special_request = Some("y".repeat(250));
        let out = format_booking(&b);
        assert!(out.ends_with(&format!("Yêu cầu đặc biệt: {}...", "y".repeat(200))));
    }

    #[test]
    fn test_booking_list_header_names_customer() {
        let mut second = booking();
        second.id = "7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string();
        second.status = BookingStatus::Pending;
        let out = format_booking_list(&[booking(), second]);

        assert!(out.starts_with("Danh sách đặt tour của Nguyễn Văn An:\n📌 "));
        assert!(out.contains("Mã: 3f2504e0... | Trạng thái: Đã xác nhận"));
        assert!(out.contains("Mã: 7c9e6679... | Trạng thái: Chờ xác nhận"));
        assert_eq!(out.matches("📌").count(), 2);
    }

    #[test]
    fn test_booking_list_field_order() {
        let out = format_booking_list(&[booking()]);
        let title = out.find("Khám phá").unwrap();
        let price = out.find("Tổng tiền").unwrap();
        let schedule = out.find("Lịch trình").unwrap();
        let status = out.find("Trạng thái").unwrap();
        assert!(title < price && price < schedule && schedule < status);
    }

    #[test]
    fn test_booking_list_without_name() {
        let mut b = booking();
        b.customer_name = None;
        assert!(format_booking_list(&[b]).starts_with("Danh sách đặt tour của Khách hàng:"));
    }

    #[test]
    fn test_not_found_sentences() {
        assert_eq!(format_booking_list(&[]), "Không tìm thấy đơn đặt tour nào.");
        assert_eq!(
            format_booking_not_found("abc"),
            "Không tìm thấy booking với mã abc."
        );
    }
}
