// region:    --- Imports
use super::model::ListingStatus;

// endregion: --- Imports

// region:    --- Status Classifier

/// 시작/종료 시각과 현재 시각으로 유효 파티션을 판정한다.
///
/// 저장된 status 값은 참고하지 않는다. 판정 순서:
/// 진행 중(`starts_at <= now < ends_at`) → 예정(`starts_at > now`) → 종료(`ends_at <= now`).
pub fn classify(starts_at: i64, ends_at: i64, now: i64) -> ListingStatus {
    if starts_at <= now && now < ends_at {
        ListingStatus::Running
    } else if starts_at > now {
        ListingStatus::Upcoming
    } else {
        ListingStatus::Expired
    }
}

// endregion: --- Status Classifier

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_belong_to_exactly_one_partition() {
        // 시작 시각 정각은 진행 중
        assert_eq!(classify(100, 200, 100), ListingStatus::Running);
        // 종료 시각 정각은 종료
        assert_eq!(classify(100, 200, 200), ListingStatus::Expired);
        assert_eq!(classify(100, 200, 99), ListingStatus::Upcoming);
    }

    #[test]
    fn inverted_window_before_start_is_upcoming() {
        assert_eq!(classify(300, 200, 250), ListingStatus::Upcoming);
        assert_eq!(classify(300, 200, 300), ListingStatus::Expired);
    }

    proptest! {
        #[test]
        fn exactly_one_partition_matches(
            starts_at in -1_000i64..1_000,
            ends_at in -1_000i64..1_000,
            now in -1_000i64..1_000,
        ) {
            let running = starts_at <= now && now < ends_at;
            let upcoming = starts_at > now;
            let expired = starts_at <= now && ends_at <= now;

            // SQL 파티션 조건과 동일한 술어가 정확히 하나만 참이어야 한다
            let matches = [running, upcoming, expired].iter().filter(|m| **m).count();
            prop_assert_eq!(matches, 1);

            let expected = if running {
                ListingStatus::Running
            } else if upcoming {
                ListingStatus::Upcoming
            } else {
                ListingStatus::Expired
            };
            prop_assert_eq!(classify(starts_at, ends_at, now), expected);
        }
    }
}
