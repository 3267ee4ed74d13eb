/// What the run produced, printed to stdout once provisioning settles.
pub struct JobInfo {
    pub project_id: String,
    pub zone: String,
    pub instance_group_name: String,
    pub instance_ids: Vec<u64>,
}

impl JobInfo {
    pub fn print_job_info(&self) {
        println!("{}", self.summary());
    }

    fn summary(&self) -> String {
        let ids = self
            .instance_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Launched instance group\n\
               project:        {}\n\
               zone:           {}\n\
               instance group: {}\n\
               instances ({}): {}",
            self.project_id,
            self.zone,
            self.instance_group_name,
            self.instance_ids.len(),
            ids,
        )
    }
}
