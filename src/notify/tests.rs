//! Tests for notify module

#[cfg(test)]
mod tests {
    use super::super::{frame, Alert, Notifier};

    #[test]
    fn test_notifier_creation() {
        assert!(Notifier::new().is_enabled());
        assert!(Notifier::default().is_enabled());
    }

    #[test]
    fn test_notifier_disabled() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());
        // Must not write anything or panic
        notifier.alert("Không thể phân loại ngay lúc này.");
    }

    #[test]
    fn test_frame_contains_message() {
        let framed = frame("Câu quá ngắn! (>= 4 ký tự)");
        assert!(framed.starts_with('╔'));
        assert!(framed.ends_with('╝'));
        assert!(framed.contains("Câu quá ngắn! (>= 4 ký tự)"));
    }

    #[test]
    fn test_frame_lines_are_padded_to_same_width() {
        let framed = frame("ngắn\ndài hơn nhiều");
        let widths: Vec<usize> = framed.lines().skip(1).take(2).map(|l| l.chars().count()).collect();
        assert_eq!(widths[0], widths[1]);
    }
}
