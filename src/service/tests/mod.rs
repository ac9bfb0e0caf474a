use std::collections::HashSet;

use crate::config::{ActionScope, ConnectionType, Credentials, QuickMenu};
use crate::error::{Error, TransportError};
use crate::service::test_helpers::{
    Call, Notification, TestContext, create_logged_in_service, create_test_service,
    create_uninitialized_service, raw_task, seed_tasks, test_settings, wait_for_event, wait_until,
};
use crate::service::{
    AutoLoginOptions, AutoLoginOutcome, DownloadItem, GuardOptions, InterceptOptions,
    LocalDownloads, NewTask, QuickMenuResolution, TaskForm,
};
use crate::store::{Action, Store};
use crate::transport::{LoginResponse, TaskListOption};
use crate::types::{Event, TaskId, TaskStatus};
