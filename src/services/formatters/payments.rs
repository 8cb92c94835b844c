use super::{field, format_datetime, format_money, render_list, short_id, Item, NOT_AVAILABLE};
use crate::models::Payment;

fn method(payment: &Payment) -> String {
    payment
        .method
        .clone()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Payment history of a single booking, newest first.
pub fn format_payment_history(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return "Chưa có giao dịch thanh toán nào cho booking này.".to_string();
    }

    let items: Vec<Item> = payments
        .iter()
        .map(|p| {
            Item::new("•", format!("Thanh toán #{}", short_id(&p.id)))
                .row([
                    field("Số tiền", format_money(p.amount)),
                    field("Phương thức", method(p)),
                ])
                .row([field("Ngày", format_datetime(p.paid_at))])
                .row([
                    field("Trạng thái", p.status.label().to_string()),
                    field("Mã giao dịch", p.transaction_id.clone()),
                ])
        })
        .collect();

    render_list(
        &format!("Lịch sử thanh toán ({} giao dịch):", payments.len()),
        &items,
    )
}

/// Payments across all bookings of one customer, each tied to its tour.
pub fn format_payments_by_email(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return "Không tìm thấy thông tin thanh toán nào.".to_string();
    }

    let items: Vec<Item> = payments
        .iter()
        .map(|p| {
            let heading = p
                .tour_title
                .clone()
                .unwrap_or_else(|| format!("Thanh toán #{}", short_id(&p.id)));

            Item::new("💳", heading)
                .row([
                    field("Số tiền", format_money(p.amount)),
                    field("Phương thức", method(p)),
                ])
                .row([field("Ngày", format_datetime(p.paid_at))])
                .row([
                    field("Mã booking", p.booking_id.as_deref().map(short_id)),
                    field("Trạng thái", p.status.label().to_string()),
                ])
                .row([field(
                    "Tình trạng booking",
                    p.booking_status.as_ref().map(|s| s.label().to_string()),
                )])
        })
        .collect();

    render_list("Thông tin thanh toán:", &items)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{BookingStatus, PaymentStatus};

    fn payment() -> Payment {
        Payment {
            id: "e7a1c3b2-1111-4d2e-8f00-aaaaaaaaaaa1".to_string(),
            amount: Some(6_885_000.0),
            method: Some("VNPAY".to_string()),
            status: PaymentStatus::Success,
            transaction_id: Some("VNP14123456".to_string()),
            paid_at: NaiveDate::from_ymd_opt(2026, 9, 1).and_then(|d| d.and_hms_opt(10, 5, 0)),
            booking_id: None,
            booking_status: None,
            tour_title: None,
        }
    }

    #[test]
    fn test_payment_history_layout() {
        assert_eq!(
            format_payment_history(&[payment()]),
            "Lịch sử thanh toán (1 giao dịch):\n\
             • Thanh toán #e7a1c3b2...\n   \
             Số tiền: 6.885.000₫ | Phương thức: VNPAY\n   \
             Ngày: 01/09/2026 10:05\n   \
             Trạng thái: Thành công | Mã giao dịch: VNP14123456"
        );
    }

    #[test]
    fn test_missing_amount_and_method() {
        let mut p = payment();
        p.amount = None;
        p.method = None;
        p.transaction_id = None;
        let out = format_payment_history(&[p]);
        assert!(out.contains("Số tiền: Liên hệ | Phương thức: N/A"));
        assert!(!out.contains("Mã giao dịch"));
    }

    #[test]
    fn test_payments_by_email_with_tour() {
        let mut p = payment();
        p.status = PaymentStatus::Refunded;
        p.booking_id = Some("a1b2c3d4-e5f6-4a5b-8c7d-9e8f7a6b5c4d".to_string());
        p.booking_status = Some(BookingStatus::Confirmed);
        p.tour_title = Some("Bà Nà Hills trọn gói".to_string());
        let out = format_payments_by_email(&[p]);

        assert!(out.starts_with("Thông tin thanh toán:\n💳 Bà Nà Hills trọn gói"));
        assert!(out.contains("Mã booking: a1b2c3d4... | Trạng thái: Đã hoàn tiền"));
        assert!(out.ends_with("Tình trạng booking: Đã xác nhận"));
    }

    #[test]
    fn test_unknown_payment_status_renders_raw() {
        let mut p = payment();
        p.status = PaymentStatus::Other("CHARGEBACK".to_string());
        assert!(format_payment_history(&[p]).contains("Trạng thái: CHARGEBACK"));
    }

    #[test]
    fn test_empty_payments() {
        assert_eq!(
            format_payment_history(&[]),
            "Chưa có giao dịch thanh toán nào cho booking này."
        );
        assert_eq!(
            format_payments_by_email(&[]),
            "Không tìm thấy thông tin thanh toán nào."
        );
    }
}
