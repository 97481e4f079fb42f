//! Dashboards and the profitability report.

use chrono::{Datelike, Days, Months, NaiveDateTime, NaiveTime};

use super::auth::Auth;
use super::decode_gate::{decode_rows, RowPolicy, ROWS_FIELD};
use super::entity::{decode_value, format_moment};
use super::error::{Error, SdkResult};
use super::model::{Dashboard, SaleByProduct};
use super::ports::Endpoint;
use super::service::DataService;
use super::url_parameters::{merge_url_parameters, Offset, UrlParameter};

/// Calendar period relative to the current moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Day,
    /// Monday through Sunday.
    Week,
    Month,
}

impl ReportPeriod {
    /// First and last second of the period containing `now`.
    ///
    /// Returns `None` only at the edges of the representable calendar.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDateTime;
    /// use moysklad_sdk::domain::ReportPeriod;
    ///
    /// let now: NaiveDateTime = "2024-02-14T10:00:00".parse().unwrap();
    /// let (from, to) = ReportPeriod::Month.bounds(now).unwrap();
    /// assert_eq!(from.to_string(), "2024-02-01 00:00:00");
    /// assert_eq!(to.to_string(), "2024-02-29 23:59:59");
    /// ```
    pub fn bounds(self, now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let today = now.date();
        let (first, last) = match self {
            Self::Day => (today, today),
            Self::Week => {
                let from_monday = u64::from(today.weekday().num_days_from_monday());
                let monday = today.checked_sub_days(Days::new(from_monday))?;
                (monday, monday.checked_add_days(Days::new(6))?)
            }
            Self::Month => {
                let first = today.with_day(1)?;
                let next = first.checked_add_months(Months::new(1))?;
                (first, next.pred_opt()?)
            }
        };
        let start_of_day = NaiveTime::from_hms_opt(0, 0, 0)?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        Some((first.and_time(start_of_day), last.and_time(end_of_day)))
    }

    fn dashboard_endpoint(self) -> Endpoint {
        match self {
            Self::Day => Endpoint::DashboardDay,
            Self::Week => Endpoint::DashboardWeek,
            Self::Month => Endpoint::DashboardMonth,
        }
    }
}

impl DataService {
    /// Dashboard of the current day. An empty response yields `None`.
    ///
    /// # Errors
    /// Transport failures, or a body that is not a dashboard.
    pub async fn dashboard_day(&self, auth: &Auth) -> SdkResult<Option<Dashboard>> {
        self.dashboard(auth, ReportPeriod::Day).await
    }

    /// Dashboard of the current week. An empty response yields `None`.
    ///
    /// # Errors
    /// Transport failures, or a body that is not a dashboard.
    pub async fn dashboard_week(&self, auth: &Auth) -> SdkResult<Option<Dashboard>> {
        self.dashboard(auth, ReportPeriod::Week).await
    }

    /// Dashboard of the current month. An empty response yields `None`.
    ///
    /// # Errors
    /// Transport failures, or a body that is not a dashboard.
    pub async fn dashboard_month(&self, auth: &Auth) -> SdkResult<Option<Dashboard>> {
        self.dashboard(auth, ReportPeriod::Month).await
    }

    /// Profitability by product between `from` and `to`.
    ///
    /// # Errors
    /// Transport failures, malformed envelopes and rows that do not decode.
    pub async fn sales_by_product(
        &self,
        auth: &Auth,
        from: NaiveDateTime,
        to: NaiveDateTime,
        offset: Option<Offset>,
    ) -> SdkResult<Vec<SaleByProduct>> {
        let endpoint = Endpoint::SalesByProduct;
        let parameters = merge_url_parameters([
            offset.map(UrlParameter::Offset),
            Some(UrlParameter::generic("momentFrom", format_moment(from))),
            Some(UrlParameter::generic("momentTo", format_moment(to))),
        ]);
        let document = self.fetch(endpoint, auth, &[], &parameters).await?;
        decode_rows(
            &document,
            endpoint,
            ROWS_FIELD,
            RowPolicy::Strict,
            decode_value::<SaleByProduct>,
        )
    }

    /// Profitability by product for the period containing now.
    ///
    /// # Errors
    /// See [`DataService::sales_by_product`].
    pub async fn sales_by_product_for(
        &self,
        auth: &Auth,
        period: ReportPeriod,
        offset: Option<Offset>,
    ) -> SdkResult<Vec<SaleByProduct>> {
        let (from, to) = period
            .bounds(self.now())
            .ok_or_else(|| Error::invalid_request("report period is out of calendar range"))?;
        self.sales_by_product(auth, from, to, offset).await
    }

    /// Profitability by product for the current day.
    ///
    /// # Errors
    /// See [`DataService::sales_by_product`].
    pub async fn sales_by_product_day(
        &self,
        auth: &Auth,
        offset: Option<Offset>,
    ) -> SdkResult<Vec<SaleByProduct>> {
        self.sales_by_product_for(auth, ReportPeriod::Day, offset)
            .await
    }

    /// Profitability by product for the current week.
    ///
    /// # Errors
    /// See [`DataService::sales_by_product`].
    pub async fn sales_by_product_week(
        &self,
        auth: &Auth,
        offset: Option<Offset>,
    ) -> SdkResult<Vec<SaleByProduct>> {
        self.sales_by_product_for(auth, ReportPeriod::Week, offset)
            .await
    }

    /// Profitability by product for the current month.
    ///
    /// # Errors
    /// See [`DataService::sales_by_product`].
    pub async fn sales_by_product_month(
        &self,
        auth: &Auth,
        offset: Option<Offset>,
    ) -> SdkResult<Vec<SaleByProduct>> {
        self.sales_by_product_for(auth, ReportPeriod::Month, offset)
            .await
    }

    async fn dashboard(&self, auth: &Auth, period: ReportPeriod) -> SdkResult<Option<Dashboard>> {
        let endpoint = period.dashboard_endpoint();
        let document = self.fetch(endpoint, auth, &[], &[]).await?;
        if document.is_null() {
            return Ok(None);
        }
        if !document.is_object() {
            return Err(Error::malformed(endpoint));
        }
        decode_value(&document)
            .map(Some)
            .ok_or_else(|| Error::malformed(endpoint))
    }
}
