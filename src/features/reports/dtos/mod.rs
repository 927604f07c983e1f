pub mod report_dto;

pub use report_dto::{
    parse_status_filter, CategoryDisplayDto, ListReportsQuery, MapMarkerDto, MapQuery,
    MapSelectionDto, MapViewDto, ReportBucketDto, ReportBucketsDto, ReportDetailResponseDto,
    ReportResponseDto, StatusBadgeDto, UpdateReportStatusDto,
};
