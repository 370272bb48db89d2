pub mod attendance;
pub mod bookings;
pub mod employees;
pub mod members;
pub mod payments;
pub mod plans;
pub mod schedules;
pub mod services;
pub mod users;

pub use attendance::{AttendanceRepo, AttendanceSummary, DailyAttendanceStat};
pub use employees::{CreateEmployee, EmployeeFilter, EmployeeRepo, UpdateEmployee};
pub use members::{CreateMember, MemberFilter, MemberRepo, UpdateMember};
pub use payments::{
    CreatePayment, DailyPaymentStat, PaymentFilter, PaymentRepo, UpdatePayment,
};
pub use plans::{CreatePlan, PlanRepo, UpdatePlan};
pub use schedules::{CreateSchedule, ScheduleRepo};
pub use services::{CreateService, ServiceRepo, UpdateService};
pub use users::{CreateUser, UserRepo};
