#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::{cmp::Ordering, fmt, str::FromStr};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{models::GameRatingEntity, storage::StorageResult};

/// Abstraction over the persistence layer for game ratings.
///
/// `save` is an upsert: ratings without an identifier receive a fresh one, ratings
/// carrying one replace whatever was stored under it. `delete` succeeds whether or
/// not the identifier exists.
pub trait RatingStore: Send + Sync {
    fn save(&self, rating: GameRatingEntity) -> BoxFuture<'static, StorageResult<GameRatingEntity>>;
    fn find_all(
        &self,
        request: PageRequest,
    ) -> BoxFuture<'static, StorageResult<Page<GameRatingEntity>>>;
    fn find_one(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRatingEntity>>>;
    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Rating attribute a page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    GameName,
    Score,
    Reviewer,
}

impl SortField {
    /// Name used on the wire (query strings and JSON).
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::GameName => "gameName",
            SortField::Score => "score",
            SortField::Reviewer => "reviewer",
        }
    }

    fn compare(self, left: &GameRatingEntity, right: &GameRatingEntity) -> Ordering {
        match self {
            SortField::Id => left.id.cmp(&right.id),
            SortField::GameName => left.game_name.cmp(&right.game_name),
            SortField::Score => left.score.cmp(&right.score),
            SortField::Reviewer => left.reviewer.cmp(&right.reviewer),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" => Ok(SortField::Id),
            "gameName" => Ok(SortField::GameName),
            "score" => Ok(SortField::Score),
            "reviewer" => Ok(SortField::Reviewer),
            other => Err(format!("unknown sort property `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(format!("unknown sort direction `{value}`"))
        }
    }
}

/// Single ordering clause, e.g. `score,desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// Parse `field` or `field,asc|desc`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(',').map(str::trim);
        let field = parts.next().unwrap_or_default().parse::<SortField>()?;
        let direction = match parts.next() {
            Some(direction) if !direction.is_empty() => direction.parse::<Direction>()?,
            _ => Direction::Asc,
        };
        if parts.next().is_some() {
            return Err(format!("invalid sort expression `{value}`"));
        }
        Ok(Self { field, direction })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        write!(f, "{},{}", self.field.as_str(), direction)
    }
}

/// Zero-based page selection with optional ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Whether the requested page starts at or after the last of `total` elements.
    pub fn starts_past(&self, total: u64) -> bool {
        self.offset() >= total
    }

    /// Order two ratings according to the requested sort, falling back to the identifier.
    pub fn compare(&self, left: &GameRatingEntity, right: &GameRatingEntity) -> Ordering {
        self.sort
            .iter()
            .map(|order| {
                let ordering = order.field.compare(left, right);
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.id.cmp(&right.id))
    }

    /// Sort and slice an in-process collection. Used by backends without native paging.
    pub fn paginate(&self, mut items: Vec<GameRatingEntity>) -> Page<GameRatingEntity> {
        let total_elements = items.len() as u64;
        items.sort_by(|left, right| self.compare(left, right));
        let content = items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.size).unwrap_or(usize::MAX))
            .collect();
        Page::new(content, self, total_elements)
    }
}

/// Slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_page_index_starts_past_any_total() {
        let request = PageRequest::new(100_000_000_000_000_000, 100);
        assert!(request.offset() > i64::MAX as u64);
        assert!(request.starts_past(3));
        assert!(PageRequest::new(1, 20).starts_past(20));
        assert!(!PageRequest::new(0, 20).starts_past(1));
        assert!(PageRequest::new(0, 20).starts_past(0));
    }

    fn rating(name: &str, score: u8) -> GameRatingEntity {
        GameRatingEntity {
            id: Some(Uuid::new_v4()),
            game_name: name.into(),
            score,
            comment: None,
            reviewer: None,
        }
    }

    #[test]
    fn parses_sort_expressions() {
        assert_eq!(
            "score,desc".parse::<SortOrder>(),
            Ok(SortOrder::desc(SortField::Score))
        );
        assert_eq!(
            "gameName".parse::<SortOrder>(),
            Ok(SortOrder::asc(SortField::GameName))
        );
        assert_eq!(
            "reviewer,ASC".parse::<SortOrder>(),
            Ok(SortOrder::asc(SortField::Reviewer))
        );
        assert!("unknown,asc".parse::<SortOrder>().is_err());
        assert!("score,sideways".parse::<SortOrder>().is_err());
        assert!("score,asc,extra".parse::<SortOrder>().is_err());
    }

    #[test]
    fn sort_order_display_matches_query_syntax() {
        assert_eq!(SortOrder::desc(SortField::Score).to_string(), "score,desc");
    }

    #[test]
    fn paginate_orders_then_slices() {
        let items = vec![
            rating("Celeste", 8),
            rating("Hades", 10),
            rating("Braid", 7),
            rating("Tunic", 9),
            rating("Fez", 6),
        ];
        let request = PageRequest::new(1, 2).with_sort(vec![SortOrder::desc(SortField::Score)]);

        let page = request.paginate(items);

        let names: Vec<_> = page.content.iter().map(|r| r.game_name.as_str()).collect();
        assert_eq!(names, ["Celeste", "Braid"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items = vec![rating("Celeste", 8), rating("Hades", 10)];
        let page = PageRequest::new(5, 2).paginate(items);
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn last_page_has_no_next() {
        let page: Page<()> = Page::new(vec![()], &PageRequest::new(2, 2), 5);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
    }
}
