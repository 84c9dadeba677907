//! Sample data loaded with `--seed`.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::resource::Resource;
use crate::store::{Record, Store};

fn insert(store: &mut Store, resource: Resource, value: Value) -> String {
    let record: Record = match value {
        Value::Object(map) => map,
        _ => Record::new(),
    };
    let created = store.create(resource, record, Utc::now());
    created
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn insert_all(store: &mut Store, resource: Resource, values: Vec<Value>) {
    for value in values {
        insert(store, resource, value);
    }
}

/// Populate every UKG collection with a small, coherent data set.
///
/// Employees are referenced by their `employee_id` code (`EMP001`...)
/// so the entitlements service, which knows only those codes, lines up.
pub fn seed(store: &mut Store) {
    let acme = insert(
        store,
        Resource::Companies,
        json!({"name": "Acme Corporation", "industry": "Technology", "size": "Large", "location": "San Francisco, CA"}),
    );
    let global = insert(
        store,
        Resource::Companies,
        json!({"name": "Global Industries", "industry": "Manufacturing", "size": "Medium", "location": "Detroit, MI"}),
    );

    insert_all(store, Resource::Employees, vec![
        json!({"first_name": "John", "last_name": "Doe", "email": "john.doe@acme.com", "employee_id": "EMP001",
               "company_id": acme, "department": "Engineering", "job_title": "Software Engineer",
               "hire_date": "2023-01-15", "status": "active"}),
        json!({"first_name": "Jane", "last_name": "Smith", "email": "jane.smith@acme.com", "employee_id": "EMP002",
               "company_id": acme, "department": "HR", "job_title": "HR Manager",
               "hire_date": "2022-06-01", "status": "active"}),
        json!({"first_name": "Bob", "last_name": "Johnson", "email": "bob.johnson@global.com", "employee_id": "EMP003",
               "company_id": global, "department": "Operations", "job_title": "Operations Manager",
               "hire_date": "2021-03-10", "status": "active"}),
    ]);

    insert_all(store, Resource::CompanyDocumentTypes, vec![
        json!({"name": "Employee Handbook", "description": "Company employee handbook", "company_id": acme, "required": true}),
        json!({"name": "Tax Forms", "description": "Employee tax documentation", "company_id": acme, "required": true}),
    ]);

    insert_all(store, Resource::TimeOffRequests, vec![
        json!({"employee_id": "EMP001", "type": "vacation", "start_date": "2024-03-04", "end_date": "2024-03-08",
               "days_requested": 5, "hours": 40.0, "reason": "Family vacation"}),
        json!({"employee_id": "EMP002", "type": "sick", "start_date": "2024-01-20", "end_date": "2024-01-20",
               "days_requested": 1, "hours": 8.0, "reason": "Medical appointment"}),
    ]);

    insert_all(store, Resource::Timesheets, vec![
        json!({"employee_id": "EMP001", "week_ending": "2024-01-26", "total_hours": 40.0,
               "regular_hours": 40.0, "overtime_hours": 0.0, "status": "submitted"}),
        json!({"employee_id": "EMP002", "week_ending": "2024-01-26", "total_hours": 38.5,
               "regular_hours": 38.5, "overtime_hours": 0.0, "status": "approved"}),
    ]);

    let run = insert(
        store,
        Resource::PayrollRuns,
        json!({"company_id": acme, "pay_period_start": "2024-01-01", "pay_period_end": "2024-01-15",
               "pay_date": "2024-01-20", "status": "completed", "total_employees": 150,
               "total_gross_pay": 375000.00, "total_net_pay": 285000.00, "run_type": "regular"}),
    );
    insert(
        store,
        Resource::PayrollRuns,
        json!({"company_id": acme, "pay_period_start": "2024-01-16", "pay_period_end": "2024-01-31",
               "pay_date": "2024-02-05", "status": "processing", "total_employees": 152,
               "total_gross_pay": 380000.00, "total_net_pay": 288000.00, "run_type": "regular"}),
    );

    insert_all(store, Resource::PayStubs, vec![
        json!({"employee_id": "EMP001", "payroll_run_id": run, "pay_date": "2024-01-20",
               "gross_pay": 2500.00, "net_pay": 1900.00, "regular_hours": 80.0, "overtime_hours": 0.0}),
        json!({"employee_id": "EMP002", "payroll_run_id": run, "pay_date": "2024-01-20",
               "gross_pay": 3000.00, "net_pay": 2280.00, "regular_hours": 80.0, "overtime_hours": 4.0}),
    ]);
    insert_all(store, Resource::Earnings, vec![
        json!({"employee_id": "EMP001", "payroll_run_id": run, "earning_type": "Regular Pay", "amount": 2400.00, "hours": 80.0, "rate": 30.00}),
        json!({"employee_id": "EMP001", "payroll_run_id": run, "earning_type": "Bonus", "amount": 100.00, "hours": 0.0, "rate": 0.00}),
    ]);
    insert_all(store, Resource::Deductions, vec![
        json!({"employee_id": "EMP001", "payroll_run_id": run, "deduction_type": "Health Insurance", "amount": 150.00, "pre_tax": true}),
        json!({"employee_id": "EMP001", "payroll_run_id": run, "deduction_type": "401k", "amount": 200.00, "pre_tax": true}),
    ]);
    insert_all(store, Resource::Taxes, vec![
        json!({"employee_id": "EMP001", "payroll_run_id": run, "tax_type": "Federal Income Tax", "amount": 180.00, "taxable_wages": 2250.00}),
        json!({"employee_id": "EMP001", "payroll_run_id": run, "tax_type": "Social Security", "amount": 139.50, "taxable_wages": 2250.00}),
        json!({"employee_id": "EMP001", "payroll_run_id": run, "tax_type": "Medicare", "amount": 32.63, "taxable_wages": 2250.00}),
    ]);

    insert_all(store, Resource::Departments, vec![
        json!({"code": "DEPT001", "name": "Engineering", "company_id": acme}),
        json!({"code": "DEPT002", "name": "HR", "company_id": acme}),
        json!({"code": "DEPT003", "name": "Operations", "company_id": global}),
    ]);
    insert_all(store, Resource::JobTitles, vec![
        json!({"title": "Software Engineer", "department": "Engineering"}),
        json!({"title": "HR Manager", "department": "HR"}),
        json!({"title": "Operations Manager", "department": "Operations"}),
    ]);
    insert_all(store, Resource::Locations, vec![
        json!({"name": "San Francisco HQ", "city": "San Francisco", "state": "CA", "company_id": acme}),
        json!({"name": "Detroit Plant", "city": "Detroit", "state": "MI", "company_id": global}),
    ]);

    let medical = insert(
        store,
        Resource::BenefitPlans,
        json!({"name": "PPO Medical", "type": "medical", "provider": "Blue Shield"}),
    );
    insert(
        store,
        Resource::BenefitPlans,
        json!({"name": "401k Match", "type": "retirement", "provider": "Fidelity"}),
    );
    insert(
        store,
        Resource::EmployeeBenefits,
        json!({"employee_id": "EMP001", "benefit_id": medical, "coverage": "employee+spouse", "status": "enrolled"}),
    );

    insert_all(store, Resource::PtoPlans, vec![
        json!({"employee_id": "EMP001", "leave_type": "vacation", "name": "Standard Vacation", "accrual_rate_hours": 6.67}),
        json!({"employee_id": "EMP001", "leave_type": "sick", "name": "Sick Leave", "accrual_rate_hours": 3.33}),
        json!({"employee_id": "EMP002", "leave_type": "vacation", "name": "Standard Vacation", "accrual_rate_hours": 6.67}),
        json!({"employee_id": "EMP003", "leave_type": "vacation", "name": "Senior Vacation", "accrual_rate_hours": 10.0}),
    ]);
    insert_all(store, Resource::AccrualBalances, vec![
        json!({"employee_id": "EMP001", "leave_type": "vacation", "available_hours": 64.0, "as_of": "2024-01-31"}),
        json!({"employee_id": "EMP001", "leave_type": "sick", "available_hours": 24.0, "as_of": "2024-01-31"}),
        json!({"employee_id": "EMP002", "leave_type": "vacation", "available_hours": 16.0, "as_of": "2024-01-31"}),
        json!({"employee_id": "EMP003", "leave_type": "vacation", "available_hours": 80.0, "as_of": "2024-01-31"}),
    ]);

    insert_all(store, Resource::OrgUnits, vec![
        json!({"name": "Engineering", "company_id": acme, "parent_id": null}),
        json!({"name": "Platform", "company_id": acme, "parent_id": "Engineering"}),
    ]);
    insert_all(store, Resource::AuditLogs, vec![
        json!({"action": "employee.created", "actor": "system", "target": "EMP001"}),
        json!({"action": "payroll.completed", "actor": "payroll-bot", "target": run}),
    ]);

    info!(
        companies = store.collection(Resource::Companies).len(),
        employees = store.collection(Resource::Employees).len(),
        "seeded sample data"
    );
}
