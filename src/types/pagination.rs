use std::collections::HashMap;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Pagination 구조체는 쿼리 매개변수에서 추출된다
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1부터 시작하는 페이지 번호
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            per_page: QUESTIONS_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        paginate(items, self.page, self.per_page)
    }
}

/// `page` 매개변수를 /questions 경로에서 추출하기
/// # 예제 쿼리
/// /questions?page=2
///
/// 값이 없거나, 숫자가 아니거나, 1보다 작으면 첫 페이지로 취급한다.
/// # 사용 예
/// ```rust
/// use std::collections::HashMap;
/// use trivia_api::types::pagination::extract_pagination;
///
/// let mut query = HashMap::new();
/// query.insert("page".to_string(), "2".to_string());
/// let p = extract_pagination(&query);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.per_page, 10);
///
/// query.insert("page".to_string(), "two".to_string());
/// assert_eq!(extract_pagination(&query).page, 1);
/// ```
pub fn extract_pagination(params: &HashMap<String, String>) -> Pagination {
    let page = params
        .get("page")
        .and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .and_then(|p| usize::try_from(p).ok())
        .unwrap_or(1);

    Pagination {
        page,
        ..Pagination::default()
    }
}

/// 1부터 시작하는 `page`에 해당하는 항목을 반환한다. 범위를 벗어나면 빈 벡터를 반환한다.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Vec<T> {
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    items.into_iter().skip(start).take(per_page).collect()
}
